//! Terminal user interface for browsing a sales CRM: leads, tasks,
//! automation rules, team members, wizards and services, each as a
//! searchable, filterable, paginated list backed by the CRM REST API.

pub mod app;
pub mod collection;
pub mod config;
pub mod crm;
pub mod error;
pub mod events;
pub mod export;
pub mod logger;
pub mod session;
pub mod state;
pub mod ui;
pub mod utils;
