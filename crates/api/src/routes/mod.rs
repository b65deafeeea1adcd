//! Route Handlers

pub mod alerts;
pub mod maintenance;
pub mod predictions;
pub mod sensors;
