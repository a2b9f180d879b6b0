pub mod savings_controller;
