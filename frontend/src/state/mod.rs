pub mod dashboard_state;
pub mod query;
pub mod requests;

pub use dashboard_state::{
    CategoriesOutcome, DashboardState, FetchOutcome, Mutation, MutationKind, MutationOutcome,
    MutationStatus,
};
