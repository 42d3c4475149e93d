//! Course recommendation service
//!
//! Loads the course, student, enrollment and academic-record tables once,
//! repairs known corruption in the course catalog, and ranks the courses
//! each student is eligible for and should take next.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
