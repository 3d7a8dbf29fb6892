//! Scoped release of resources.
//!
//! A release action is a nullary closure registered inside a scope. However the scope is left
//! (end of block, early `return`, `?` or unwinding), the registered actions run exactly once, in
//! reverse registration order.
//!
//! Release actions are best-effort: they cannot report failure. If one of them panics, the panic
//! is caught, logged and the remaining actions still run.
//!
//! > Note: a release action panicking *while the thread is already unwinding* aborts the process;
//! > this is how Rust handles nested panics and nothing can be done about it here.

use std::{
  any::Any,
  fmt,
  panic::{self, AssertUnwindSafe},
};

/// A single release action, run when the guard is dropped.
///
/// ```
/// use lumen::scope::Defer;
///
/// let mut released = false;
///
/// {
///   let _guard = Defer::new(|| released = true);
/// }
///
/// assert!(released);
/// ```
#[must_use = "the action runs as soon as the guard is dropped"]
pub struct Defer<F>
where
  F: FnOnce(),
{
  action: Option<F>,
}

impl<F> Defer<F>
where
  F: FnOnce(),
{
  /// Register `action` to be run when the returned guard goes out of scope.
  pub fn new(action: F) -> Self {
    Defer {
      action: Some(action),
    }
  }

  /// Disarm the guard. The action is dropped without being run.
  pub fn cancel(mut self) {
    self.action = None;
  }
}

impl<F> Drop for Defer<F>
where
  F: FnOnce(),
{
  fn drop(&mut self) {
    if let Some(action) = self.action.take() {
      run_release(action);
    }
  }
}

impl<F> fmt::Debug for Defer<F>
where
  F: FnOnce(),
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("Defer")
      .field("armed", &self.action.is_some())
      .finish()
  }
}

/// A stack of release actions.
///
/// Actions are pushed with [`ReleaseStack::defer`] and popped (run) in LIFO order, either
/// explicitly with [`ReleaseStack::release`] or when the stack is dropped.
#[derive(Default)]
pub struct ReleaseStack<'a> {
  actions: Vec<Box<dyn FnOnce() + 'a>>,
}

impl<'a> ReleaseStack<'a> {
  /// Create an empty stack.
  pub fn new() -> Self {
    ReleaseStack {
      actions: Vec::new(),
    }
  }

  /// Register a release action.
  pub fn defer(&mut self, action: impl FnOnce() + 'a) -> &mut Self {
    self.actions.push(Box::new(action));
    self
  }

  /// Number of actions still pending.
  pub fn len(&self) -> usize {
    self.actions.len()
  }

  /// Whether no action is pending.
  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Run every pending action now, last registered first.
  ///
  /// The stack is left empty and can be reused.
  pub fn release(&mut self) {
    while let Some(action) = self.actions.pop() {
      run_release(action);
    }
  }
}

impl Drop for ReleaseStack<'_> {
  fn drop(&mut self) {
    self.release();
  }
}

impl fmt::Debug for ReleaseStack<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("ReleaseStack")
      .field("pending", &self.actions.len())
      .finish()
  }
}

fn run_release<F>(action: F)
where
  F: FnOnce(),
{
  if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(action)) {
    log::error!("release action failed: {}", panic_message(&*payload));
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(msg) = payload.downcast_ref::<&str>() {
    msg
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.as_str()
  } else {
    "unknown failure"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{cell::RefCell, rc::Rc};

  fn recorder() -> Rc<RefCell<Vec<u32>>> {
    Rc::new(RefCell::new(Vec::new()))
  }

  #[test]
  fn defer_runs_on_scope_exit() {
    let log = recorder();

    {
      let log = log.clone();
      let _guard = Defer::new(move || log.borrow_mut().push(1));
    }

    assert_eq!(*log.borrow(), vec![1]);
  }

  #[test]
  fn cancelled_defer_never_runs() {
    let log = recorder();

    {
      let log = log.clone();
      let guard = Defer::new(move || log.borrow_mut().push(1));
      guard.cancel();
    }

    assert!(log.borrow().is_empty());
  }

  #[test]
  fn stack_releases_in_reverse_order() {
    let log = recorder();

    {
      let mut stack = ReleaseStack::new();

      for i in 0..4 {
        let log = log.clone();
        stack.defer(move || log.borrow_mut().push(i));
      }

      assert_eq!(stack.len(), 4);
    }

    assert_eq!(*log.borrow(), vec![3, 2, 1, 0]);
  }

  #[test]
  fn explicit_release_runs_exactly_once() {
    let log = recorder();
    let mut stack = ReleaseStack::new();

    {
      let log = log.clone();
      stack.defer(move || log.borrow_mut().push(7));
    }

    stack.release();
    assert!(stack.is_empty());
    drop(stack);

    assert_eq!(*log.borrow(), vec![7]);
  }

  // Mimics a bootstrap sequence bailing out after its second step: only the two registered
  // releases run, most recent first.
  #[test]
  fn early_return_releases_registered_actions() {
    fn bootstrap(log: &Rc<RefCell<Vec<u32>>>, fail_at: u32) -> Result<(), u32> {
      let mut stack = ReleaseStack::new();

      for step in 0..3 {
        if step == fail_at {
          return Err(step);
        }

        let log = log.clone();
        stack.defer(move || log.borrow_mut().push(step));
      }

      Ok(())
    }

    let log = recorder();
    assert_eq!(bootstrap(&log, 2), Err(2));
    assert_eq!(*log.borrow(), vec![1, 0]);

    let log = recorder();
    assert_eq!(bootstrap(&log, 3), Ok(()));
    assert_eq!(*log.borrow(), vec![2, 1, 0]);
  }

  #[test]
  fn unwinding_releases_registered_actions() {
    let log = recorder();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
      let mut stack = ReleaseStack::new();

      let first = log.clone();
      stack.defer(move || first.borrow_mut().push(0));
      let second = log.clone();
      stack.defer(move || second.borrow_mut().push(1));

      panic!("bootstrap exploded");
    }));

    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec![1, 0]);
  }

  #[test]
  fn failing_action_is_swallowed() {
    let log = recorder();

    {
      let mut stack = ReleaseStack::new();

      let first = log.clone();
      stack.defer(move || first.borrow_mut().push(0));
      stack.defer(|| panic!("driver went away"));
      let last = log.clone();
      stack.defer(move || last.borrow_mut().push(2));
    }

    assert_eq!(*log.borrow(), vec![2, 0]);
  }
}
