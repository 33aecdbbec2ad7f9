//! # Device Doubles
//!
//! - `region`: a `Device` whose word traffic goes to a `mockall` mock.
//! - `shared`: a `Bram` behind `Rc<RefCell<_>>`, inspectable after it is boxed.
//! - `gpio`: a GPIO block that raises done after a scripted number of polls.


/// `mockall`-generated region.
pub mod region;
