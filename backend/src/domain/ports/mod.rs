//! Domain ports: the seams between portal use cases and their adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_refresh;
mod department_api;
mod session_store;

#[cfg(test)]
pub use collection_refresh::MockCollectionRefresh;
pub use collection_refresh::{CollectionRefresh, NoOpCollectionRefresh};
#[cfg(test)]
pub use department_api::MockDepartmentApi;
pub use department_api::{ApiError, DepartmentApi, NETWORK_ERROR_MESSAGE};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub(crate) use session_store::decode_user;
pub use session_store::{InMemorySessionStore, SessionStore};
