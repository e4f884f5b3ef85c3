pub mod form_assist;
pub mod health;
