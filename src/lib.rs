pub mod cli;
pub mod config;
pub mod editor;
pub mod gather;
pub mod model;
pub mod params;
pub mod parse;
pub mod rpc;
pub mod scope;
pub mod search;
pub mod util;
