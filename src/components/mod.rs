pub mod reset_control;
