mod dispatch_engine;

pub use dispatch_engine::DispatchEngine;
