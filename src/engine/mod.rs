// Jsonp Engine
//
// Platform primitives (globals, document head, loader), configuration and
// the two bridges built on top of them.

pub mod config;
pub mod document;
pub mod globals;
pub mod jsonp;
pub mod loader;
pub mod page;
