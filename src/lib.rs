//! sheetapi - serve a spreadsheet file as a CRUD JSON API

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod table;
