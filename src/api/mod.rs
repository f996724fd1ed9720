pub mod health;
pub mod metrics;
pub mod swagger;
pub mod widget;
