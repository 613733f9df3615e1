pub mod builder;
pub mod chart_entity;
pub mod validate;
