use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use shared::{ChartKind, FilterField};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::MUTATION_NOTICE_MS;
use crate::services::ApiClient;
use crate::state::query::RequestTracker;
use crate::state::requests::{fetch_categories, fetch_transactions, run_mutation};
use crate::state::{
    CategoriesOutcome, DashboardState, FetchOutcome, Mutation, MutationKind, MutationOutcome,
};

#[derive(Debug)]
pub enum DashboardAction {
    SetFilter { field: FilterField, value: String },
    ClearFilters,
    Refetch,
    FetchResolved(FetchOutcome),
    RefetchCategories,
    CategoriesResolved(CategoriesOutcome),
    MutationStarted { generation: u64, kind: MutationKind },
    MutationFinished(MutationOutcome),
    DismissMutation(u64),
    SetChartKind(ChartKind),
}

impl Reducible for DashboardState {
    type Action = DashboardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            DashboardAction::SetFilter { field, value } => {
                next.set_filter(field, &value);
            }
            DashboardAction::ClearFilters => {
                next.clear_filters();
            }
            DashboardAction::Refetch => {
                next.refetch();
            }
            DashboardAction::FetchResolved(outcome) => {
                if !next.apply_fetch(outcome) {
                    return self;
                }
            }
            DashboardAction::RefetchCategories => {
                next.refetch_categories();
            }
            DashboardAction::CategoriesResolved(outcome) => {
                if !next.apply_categories(outcome) {
                    return self;
                }
            }
            DashboardAction::MutationStarted { generation, kind } => {
                next.begin_mutation(generation, kind)
            }
            DashboardAction::MutationFinished(outcome) => {
                next.finish_mutation(outcome);
            }
            DashboardAction::DismissMutation(generation) => next.dismiss_mutation(generation),
            DashboardAction::SetChartKind(kind) => next.set_chart_kind(kind),
        }

        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

pub struct UseDashboardResult {
    pub state: UseReducerHandle<DashboardState>,
    pub actions: DashboardActions,
}

#[derive(Clone, PartialEq)]
pub struct DashboardActions {
    pub set_filter: Callback<(FilterField, String)>,
    pub clear_filters: Callback<()>,
    pub refetch: Callback<()>,
    pub mutate: Callback<Mutation>,
    /// Hides the notice of the given mutation generation
    pub dismiss_mutation: Callback<u64>,
    pub set_chart_kind: Callback<ChartKind>,
}

/// Dashboard state wired to the API: issues the initial fetches on mount and
/// runs every ticket the state machine hands out.
#[hook]
pub fn use_dashboard(api_client: &ApiClient, chart_kind: ChartKind) -> UseDashboardResult {
    let state = use_reducer(move || DashboardState::new(chart_kind));

    // Mutation generations are handed out here, before the request is spawned,
    // so the outcome and the notice timer can name the mutation they belong to
    let mutation_requests = use_mut_ref(RequestTracker::default);

    // Initial load on mount
    {
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            dispatcher.dispatch(DashboardAction::Refetch);
            dispatcher.dispatch(DashboardAction::RefetchCategories);
            || ()
        });
    }

    {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        // Re-runs whenever the state hands out a new ticket. A stale response
        // is dropped by the reducer, so nothing is cancelled here
        use_effect_with(state.pending_fetch(), move |ticket| {
            if let Some(ticket) = ticket.clone() {
                spawn_local(async move {
                    let outcome = fetch_transactions(&api_client, ticket).await;
                    dispatcher.dispatch(DashboardAction::FetchResolved(outcome));
                });
            }
            || ()
        });
    }

    {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        // Same pattern for the category list
        use_effect_with(state.pending_categories(), move |generation| {
            if let Some(generation) = *generation {
                spawn_local(async move {
                    let outcome = fetch_categories(&api_client, generation).await;
                    dispatcher.dispatch(DashboardAction::CategoriesResolved(outcome));
                });
            }
            || ()
        });
    }

    // Callbacks handed to the components
    let set_filter = {
        let dispatcher = state.dispatcher();
        use_callback((), move |(field, value): (FilterField, String), _| {
            dispatcher.dispatch(DashboardAction::SetFilter { field, value });
        })
    };

    let clear_filters = {
        let dispatcher = state.dispatcher();
        use_callback((), move |_, _| dispatcher.dispatch(DashboardAction::ClearFilters))
    };

    let refetch = {
        let dispatcher = state.dispatcher();
        use_callback((), move |_, _| dispatcher.dispatch(DashboardAction::Refetch))
    };

    let mutate = {
        let dispatcher = state.dispatcher();
        use_callback(api_client.clone(), move |mutation: Mutation, api_client| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let generation = mutation_requests.borrow_mut().issue();
            dispatcher.dispatch(DashboardAction::MutationStarted {
                generation,
                kind: mutation.kind(),
            });

            spawn_local(async move {
                let outcome = run_mutation(&api_client, generation, mutation).await;
                let succeeded = outcome.result.is_ok();
                dispatcher.dispatch(DashboardAction::MutationFinished(outcome));

                // Success notices hide themselves; failures stay until dismissed
                if succeeded {
                    TimeoutFuture::new(MUTATION_NOTICE_MS).await;
                    dispatcher.dispatch(DashboardAction::DismissMutation(generation));
                }
            });
        })
    };

    let dismiss_mutation = {
        let dispatcher = state.dispatcher();
        use_callback((), move |generation: u64, _| {
            dispatcher.dispatch(DashboardAction::DismissMutation(generation))
        })
    };

    let set_chart_kind = {
        let dispatcher = state.dispatcher();
        use_callback((), move |kind: ChartKind, _| {
            dispatcher.dispatch(DashboardAction::SetChartKind(kind))
        })
    };

    UseDashboardResult {
        state,
        actions: DashboardActions {
            set_filter,
            clear_filters,
            refetch,
            mutate,
            dismiss_mutation,
            set_chart_kind,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::GatewayError;
    use crate::state::MutationStatus;

    fn reduce(state: &Rc<DashboardState>, action: DashboardAction) -> Rc<DashboardState> {
        Rc::clone(state).reduce(action)
    }

    #[test]
    fn test_filter_action_starts_loading() {
        let state = Rc::new(DashboardState::default());
        let next = reduce(
            &state,
            DashboardAction::SetFilter {
                field: FilterField::Type,
                value: "expense".to_string(),
            },
        );

        assert!(next.transactions().is_loading());
        assert_eq!(next.pending_fetch().map(|t| t.generation), Some(1));
    }

    #[test]
    fn test_stale_resolution_keeps_same_state() {
        let state = Rc::new(DashboardState::default());
        let first = reduce(&state, DashboardAction::Refetch);
        let stale = first.pending_fetch().unwrap();
        let second = reduce(&first, DashboardAction::Refetch);

        let after = reduce(
            &second,
            DashboardAction::FetchResolved(FetchOutcome {
                ticket: stale,
                result: Err(GatewayError::Network("offline".to_string())),
            }),
        );

        assert!(Rc::ptr_eq(&after, &second));
        assert!(after.transactions().is_loading());
    }

    #[test]
    fn test_unchanged_filter_keeps_same_state() {
        let state = Rc::new(DashboardState::default());
        let next = reduce(&state, DashboardAction::ClearFilters);
        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_mutation_actions() {
        let state = Rc::new(DashboardState::default());
        let pending = reduce(
            &state,
            DashboardAction::MutationStarted {
                generation: 1,
                kind: MutationKind::DeleteCategory,
            },
        );
        assert!(pending.mutation().is_pending());

        let done = reduce(
            &pending,
            DashboardAction::MutationFinished(MutationOutcome {
                generation: 1,
                kind: MutationKind::DeleteCategory,
                result: Ok(()),
            }),
        );
        assert_eq!(
            done.mutation(),
            &MutationStatus::Succeeded(MutationKind::DeleteCategory)
        );
        assert!(done.pending_categories().is_some());

        let dismissed = reduce(&done, DashboardAction::DismissMutation(1));
        assert_eq!(dismissed.mutation(), &MutationStatus::Idle);
    }

    #[test]
    fn test_success_timer_does_not_hide_later_failure() {
        let mut state = Rc::new(DashboardState::default());
        let actions = vec![
            DashboardAction::MutationStarted {
                generation: 1,
                kind: MutationKind::CreateTransaction,
            },
            DashboardAction::MutationFinished(MutationOutcome {
                generation: 1,
                kind: MutationKind::CreateTransaction,
                result: Ok(()),
            }),
            DashboardAction::MutationStarted {
                generation: 2,
                kind: MutationKind::DeleteTransaction,
            },
            DashboardAction::MutationFinished(MutationOutcome {
                generation: 2,
                kind: MutationKind::DeleteTransaction,
                result: Err(GatewayError::Http {
                    status: 500,
                    message: "Server error".to_string(),
                }),
            }),
        ];
        for action in actions {
            state = reduce(&state, action);
        }

        let after = reduce(&state, DashboardAction::DismissMutation(1));
        assert!(Rc::ptr_eq(&after, &state));
        match after.mutation() {
            MutationStatus::Failed { kind, error } => {
                assert_eq!(*kind, MutationKind::DeleteTransaction);
                assert_eq!(error.status(), Some(500));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_chart_kind_action() {
        let state = Rc::new(DashboardState::default());
        let next = reduce(&state, DashboardAction::SetChartKind(ChartKind::Line));
        assert_eq!(next.chart_kind(), ChartKind::Line);
    }
}
