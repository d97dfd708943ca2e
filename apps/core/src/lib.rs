pub mod catalog;
pub mod config;
pub mod contract;
pub mod debounce;
pub mod engine;
pub mod group;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod normalize;
pub mod rank;
pub mod recent;
pub mod score;
pub mod selection;
pub mod storage;
pub mod transport;
