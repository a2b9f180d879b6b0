// Shared test doubles: in-memory repositories driving the service layer
// without a database.

#![allow(dead_code)]

pub mod mock_repos;
