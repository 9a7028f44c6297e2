//! Motion control: degrees in, servo units out.

pub mod axis;
