//! Seams between the controller and the outside world.
//!
//! The controller never touches a page directly. It pushes slider positions,
//! preset highlighting and notices through [`FormView`], and hands finished
//! submissions to a [`Dispatcher`]. The browser crate implements both over the
//! DOM; tests implement them with recording fakes.

use crate::controller::Submission;
use crate::SettingField;

/// Blocking user-facing notices.
pub trait Notifier {
    /// Show a message and wait for the user to acknowledge it.
    fn alert(&self, message: &str);
}

/// The on-screen controls the controller keeps in sync.
pub trait FormView: Notifier {
    /// Move a slider to `value` without firing its input event.
    fn set_slider_value(&mut self, field: SettingField, value: u8);

    /// Mark every preset control tagged `name` active and all others inactive.
    fn highlight_preset(&mut self, name: &str);
}

/// Hands a submission to the generation API.
///
/// Implementations must return without waiting for the request to finish.
pub trait Dispatcher {
    fn dispatch(&self, submission: Submission);
}

impl<D: Dispatcher + ?Sized> Dispatcher for std::rc::Rc<D> {
    fn dispatch(&self, submission: Submission) {
        (**self).dispatch(submission)
    }
}
