//! Dashboard view state.
//!
//! `DashboardState` is a synchronous state machine: it issues fetch tickets,
//! and it applies outcomes only when they answer the newest ticket. The async
//! side (see `requests`) never touches the state directly.

use shared::{
    compute_aggregates, AggregateSeries, Category, ChartKind, FilterError, FilterField,
    FilterState, NewCategory, Transaction, TransactionDraft, TransactionRow,
};

use super::query::{QueryStatus, RequestTracker};
use crate::services::GatewayError;

/// A successfully loaded transaction set and the series derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTransactions {
    pub transactions: Vec<Transaction>,
    pub aggregates: AggregateSeries,
}

impl LoadedTransactions {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let aggregates = compute_aggregates(&transactions);
        Self {
            transactions,
            aggregates,
        }
    }

    pub fn rows(&self) -> Vec<TransactionRow> {
        self.transactions.iter().map(TransactionRow::from).collect()
    }
}

/// Identifies one issued transaction fetch and the filters it was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub filters: FilterState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Transaction>, GatewayError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoriesOutcome {
    pub generation: u64,
    pub result: Result<Vec<Category>, GatewayError>,
}

/// A write against the remote store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateTransaction(TransactionDraft),
    UpdateTransaction { id: String, draft: TransactionDraft },
    DeleteTransaction(String),
    CreateCategory(NewCategory),
    DeleteCategory(String),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateTransaction(_) => MutationKind::CreateTransaction,
            Mutation::UpdateTransaction { .. } => MutationKind::UpdateTransaction,
            Mutation::DeleteTransaction(_) => MutationKind::DeleteTransaction,
            Mutation::CreateCategory(_) => MutationKind::CreateCategory,
            Mutation::DeleteCategory(_) => MutationKind::DeleteCategory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    CreateTransaction,
    UpdateTransaction,
    DeleteTransaction,
    CreateCategory,
    DeleteCategory,
}

impl MutationKind {
    pub fn label(&self) -> &'static str {
        match self {
            MutationKind::CreateTransaction => "Add transaction",
            MutationKind::UpdateTransaction => "Update transaction",
            MutationKind::DeleteTransaction => "Delete transaction",
            MutationKind::CreateCategory => "Add category",
            MutationKind::DeleteCategory => "Delete category",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            MutationKind::CreateTransaction => "Transaction added",
            MutationKind::UpdateTransaction => "Transaction updated",
            MutationKind::DeleteTransaction => "Transaction deleted",
            MutationKind::CreateCategory => "Category added",
            MutationKind::DeleteCategory => "Category deleted",
        }
    }
}

/// Status of the newest started mutation, independent of the list queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending(MutationKind),
    Succeeded(MutationKind),
    Failed {
        kind: MutationKind,
        error: GatewayError,
    },
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub generation: u64,
    pub kind: MutationKind,
    pub result: Result<(), GatewayError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    filters: FilterState,
    transactions: QueryStatus<LoadedTransactions>,
    categories: QueryStatus<Vec<Category>>,
    mutation: MutationStatus,
    /// Generation of the mutation that owns `mutation`
    mutation_generation: u64,
    chart_kind: ChartKind,
    filter_error: Option<FilterError>,
    transaction_requests: RequestTracker,
    category_requests: RequestTracker,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

impl DashboardState {
    pub fn new(chart_kind: ChartKind) -> Self {
        Self {
            filters: FilterState::clear(),
            transactions: QueryStatus::Idle,
            categories: QueryStatus::Idle,
            mutation: MutationStatus::Idle,
            mutation_generation: 0,
            chart_kind,
            filter_error: None,
            transaction_requests: RequestTracker::default(),
            category_requests: RequestTracker::default(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn transactions(&self) -> &QueryStatus<LoadedTransactions> {
        &self.transactions
    }

    pub fn categories(&self) -> &QueryStatus<Vec<Category>> {
        &self.categories
    }

    /// Loaded categories, empty unless the last category fetch succeeded.
    pub fn category_list(&self) -> &[Category] {
        self.categories.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mutation(&self) -> &MutationStatus {
        &self.mutation
    }

    pub fn mutation_generation(&self) -> u64 {
        self.mutation_generation
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    /// Last rejected filter input, cleared by the next accepted one.
    pub fn filter_error(&self) -> Option<&FilterError> {
        self.filter_error.as_ref()
    }

    /// Issue a fetch for the current filters. Any earlier in-flight fetch
    /// becomes stale.
    pub fn refetch(&mut self) -> FetchTicket {
        let generation = self.transaction_requests.issue();
        self.transactions = QueryStatus::Loading;
        tracing::debug!(generation, filters = ?self.filters, "issuing transaction fetch");
        FetchTicket {
            generation,
            filters: self.filters.clone(),
        }
    }

    /// Apply raw input to one filter field.
    ///
    /// Returns the new ticket when the filters changed; unchanged or rejected
    /// input issues nothing.
    pub fn set_filter(&mut self, field: FilterField, raw: &str) -> Option<FetchTicket> {
        match self.filters.set_field(field, raw) {
            Ok(next) => {
                self.filter_error = None;
                self.replace_filters(next)
            }
            Err(error) => {
                tracing::debug!("rejected filter input: {error}");
                self.filter_error = Some(error);
                None
            }
        }
    }

    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        self.filter_error = None;
        self.replace_filters(FilterState::clear())
    }

    fn replace_filters(&mut self, next: FilterState) -> Option<FetchTicket> {
        if next == self.filters {
            return None;
        }
        self.filters = next;
        Some(self.refetch())
    }

    /// Apply a fetch result. Outcomes for superseded tickets are dropped and
    /// `false` is returned.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let generation = outcome.ticket.generation;
        if !self.transaction_requests.is_current(generation) {
            tracing::warn!(
                generation,
                latest = self.transaction_requests.latest(),
                "discarding stale transaction response"
            );
            return false;
        }

        self.transactions = match outcome.result {
            Ok(transactions) => QueryStatus::Success(LoadedTransactions::new(transactions)),
            Err(error) => QueryStatus::Error(error),
        };
        true
    }

    /// The ticket still waiting for a response, if any.
    pub fn pending_fetch(&self) -> Option<FetchTicket> {
        self.transactions.is_loading().then(|| FetchTicket {
            generation: self.transaction_requests.latest(),
            filters: self.filters.clone(),
        })
    }

    pub fn refetch_categories(&mut self) -> u64 {
        let generation = self.category_requests.issue();
        self.categories = QueryStatus::Loading;
        generation
    }

    pub fn apply_categories(&mut self, outcome: CategoriesOutcome) -> bool {
        if !self.category_requests.is_current(outcome.generation) {
            tracing::warn!(
                generation = outcome.generation,
                latest = self.category_requests.latest(),
                "discarding stale category response"
            );
            return false;
        }

        self.categories = match outcome.result {
            Ok(categories) => QueryStatus::Success(categories),
            Err(error) => QueryStatus::Error(error),
        };
        true
    }

    pub fn pending_categories(&self) -> Option<u64> {
        self.categories
            .is_loading()
            .then(|| self.category_requests.latest())
    }

    /// Record that mutation `generation` was sent. Generations come from the
    /// caller's `RequestTracker`, so a newer mutation always has a larger one.
    pub fn begin_mutation(&mut self, generation: u64, kind: MutationKind) {
        if generation < self.mutation_generation {
            return;
        }
        self.mutation_generation = generation;
        self.mutation = MutationStatus::Pending(kind);
    }

    /// Record a mutation result.
    ///
    /// Success re-issues the transaction query and the category list, even
    /// when a newer mutation has started since. The status only changes when
    /// the outcome belongs to the newest mutation; failure leaves both lists
    /// as they are.
    pub fn finish_mutation(&mut self, outcome: MutationOutcome) -> Option<FetchTicket> {
        let owns_status = outcome.generation == self.mutation_generation;
        match outcome.result {
            Ok(()) => {
                if owns_status {
                    self.mutation = MutationStatus::Succeeded(outcome.kind);
                }
                self.refetch_categories();
                Some(self.refetch())
            }
            Err(error) => {
                tracing::warn!(
                    generation = outcome.generation,
                    kind = ?outcome.kind,
                    "mutation failed: {error}"
                );
                if owns_status {
                    self.mutation = MutationStatus::Failed {
                        kind: outcome.kind,
                        error,
                    };
                }
                None
            }
        }
    }

    /// Hide the notice of mutation `generation`. Notices of newer mutations,
    /// and a pending mutation, are left alone.
    pub fn dismiss_mutation(&mut self, generation: u64) {
        if generation == self.mutation_generation && !self.mutation.is_pending() {
            self.mutation = MutationStatus::Idle;
        }
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }
}
