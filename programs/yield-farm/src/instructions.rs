#![allow(ambiguous_glob_reexports)]

pub mod add_pool;
pub mod approve_delegate;
pub mod attach_yield_source;
pub mod configure;
pub mod deposit;
pub mod detach_yield_source;
pub mod drain;
pub mod emergency_withdraw;
pub mod initialize;
pub mod reward_math;
pub mod set_pool;
pub mod strategy;
pub mod switch_yield_source;
pub mod update_pool;
pub mod withdraw;

pub use add_pool::*;
pub use approve_delegate::*;
pub use attach_yield_source::*;
pub use configure::*;
pub use deposit::*;
pub use detach_yield_source::*;
pub use drain::*;
pub use emergency_withdraw::*;
pub use initialize::*;
pub use reward_math::*;
pub use set_pool::*;
pub use strategy::*;
pub use switch_yield_source::*;
pub use update_pool::*;
pub use withdraw::*;
