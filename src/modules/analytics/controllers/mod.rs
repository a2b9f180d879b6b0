pub mod analytics_controller;
