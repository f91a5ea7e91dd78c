//! Async drivers that run gateway calls and package the result together with
//! the ticket it answers, for the state machine to apply.

use super::dashboard_state::{
    CategoriesOutcome, FetchOutcome, FetchTicket, Mutation, MutationOutcome,
};
use crate::services::TransactionGateway;

pub async fn fetch_transactions<G>(gateway: &G, ticket: FetchTicket) -> FetchOutcome
where
    G: TransactionGateway + ?Sized,
{
    let result = gateway.list_transactions(&ticket.filters).await;
    match &result {
        Ok(transactions) => tracing::debug!(
            generation = ticket.generation,
            count = transactions.len(),
            "transactions loaded"
        ),
        Err(e) => tracing::warn!(
            generation = ticket.generation,
            "failed to load transactions: {e}"
        ),
    }
    FetchOutcome { ticket, result }
}

pub async fn fetch_categories<G>(gateway: &G, generation: u64) -> CategoriesOutcome
where
    G: TransactionGateway + ?Sized,
{
    let result = gateway.list_categories().await;
    if let Err(e) = &result {
        tracing::warn!(generation, "failed to load categories: {e}");
    }
    CategoriesOutcome { generation, result }
}

pub async fn run_mutation<G>(gateway: &G, generation: u64, mutation: Mutation) -> MutationOutcome
where
    G: TransactionGateway + ?Sized,
{
    let kind = mutation.kind();
    tracing::info!(generation, ?kind, "running mutation");

    let result = match &mutation {
        Mutation::CreateTransaction(draft) => gateway.create_transaction(draft).await.map(drop),
        Mutation::UpdateTransaction { id, draft } => {
            gateway.update_transaction(id, draft).await.map(drop)
        }
        Mutation::DeleteTransaction(id) => gateway.delete_transaction(id).await,
        Mutation::CreateCategory(category) => gateway.create_category(category).await.map(drop),
        Mutation::DeleteCategory(id) => gateway.delete_category(id).await,
    };

    MutationOutcome {
        generation,
        kind,
        result,
    }
}
