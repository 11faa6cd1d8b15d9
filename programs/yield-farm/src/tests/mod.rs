//! End-to-end accounting scenarios, driven through the same settlement and
//! accrual routines the instruction handlers call.

mod harness;

mod lifecycle;
