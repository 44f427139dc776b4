//! API service modules for Domo endpoints.
//!
//! Each service covers one resource family and is a thin layer of URL
//! templating and status interpretation over the shared transport.

mod accounts;
mod datasets;
mod groups;
mod pages;
mod roles;
mod streams;
mod users;

pub use accounts::AccountsService;
pub use datasets::DataSetsService;
pub use groups::GroupsService;
pub use pages::PagesService;
pub use roles::RolesService;
pub use streams::StreamsService;
pub use users::UsersService;
