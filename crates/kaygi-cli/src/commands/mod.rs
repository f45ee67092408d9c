pub mod history;
pub mod model;
pub mod predict;
pub mod report;
pub mod send;
