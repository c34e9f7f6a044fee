//! invoice-form: semantic core of the create/edit invoice form and the
//! dashboard of the invoicing web application.
//!
//! The REST backend that stores invoices is reached through
//! [`services::InvoiceStore`]; everything else here is computation over
//! in-memory invoices.

pub mod config;
pub mod form;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
