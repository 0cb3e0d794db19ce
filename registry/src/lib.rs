pub mod consts;
pub mod math;
pub mod model;
pub mod options;
pub mod service;
pub mod store;
