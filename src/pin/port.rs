use std::cell::RefCell;
use std::rc::Rc;

/// Access to the page's native scroll position.
///
/// The runtime supplies an implementation (browser glue, headless harness); the controller
/// never touches global scroll state directly.
pub trait ScrollPort {
    /// Current document scroll offset.
    fn position(&self) -> f64;
    /// Scroll to `offset` programmatically.
    fn set_position(&mut self, offset: f64);
    /// Suppress native scrolling.
    fn lock(&mut self);
    /// Restore native scrolling.
    fn unlock(&mut self);
}

/// Identity of one lock holder inside a [`ScrollLockScope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LockToken(u64);

#[derive(Debug, Default)]
struct LockStack {
    next: u64,
    held: Vec<LockToken>,
}

/// Shared lock bookkeeping for nested sequences.
///
/// Hosts that share one scroll port share one scope. Locks stack in acquisition order and
/// only the innermost (most recent) holder may suppress native scroll; independent
/// sequences each get their own scope and never contend.
#[derive(Clone, Debug, Default)]
pub struct ScrollLockScope {
    inner: Rc<RefCell<LockStack>>,
}

impl ScrollLockScope {
    /// Empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// New token for one host.
    pub fn register(&self) -> LockToken {
        let mut stack = self.inner.borrow_mut();
        stack.next += 1;
        LockToken(stack.next)
    }

    /// Push `token` if it is not held yet. Returns whether the stack was empty before, i.e.
    /// whether the port must be locked now.
    pub fn acquire(&self, token: LockToken) -> bool {
        let mut stack = self.inner.borrow_mut();
        if stack.held.contains(&token) {
            return false;
        }
        let first = stack.held.is_empty();
        stack.held.push(token);
        first
    }

    /// Drop `token`. Returns whether the stack became empty, i.e. whether the port must be
    /// unlocked now.
    pub fn release(&self, token: LockToken) -> bool {
        let mut stack = self.inner.borrow_mut();
        let Some(pos) = stack.held.iter().position(|t| *t == token) else {
            return false;
        };
        stack.held.remove(pos);
        stack.held.is_empty()
    }

    /// Whether `token` currently holds a lock.
    pub fn is_held(&self, token: LockToken) -> bool {
        self.inner.borrow().held.contains(&token)
    }

    /// Whether `token` is the most recent holder.
    pub fn is_innermost(&self, token: LockToken) -> bool {
        self.inner.borrow().held.last() == Some(&token)
    }

    /// Number of holders.
    pub fn depth(&self) -> usize {
        self.inner.borrow().held.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pin/port.rs"]
mod tests;
