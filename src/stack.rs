/// Word stack shared by `push`/`pop` and `call`/`ret`.
#[derive(Clone, Debug, Default)]
pub struct CallStack(Vec<u16>);

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: u16) {
        self.0.push(value);
    }

    /// Returns 0 if the stack is empty.
    pub fn pop(&mut self) -> u16 {
        self.0.pop().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &u16> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CallStack {
    type Item = &'a u16;
    type IntoIter = std::slice::Iter<'a, u16>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = CallStack::new();
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), 2);
        assert_eq!(stack.pop(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn empty_pop_returns_zero() {
        let mut stack = CallStack::new();
        assert_eq!(stack.pop(), 0);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn iterates_bottom_to_top() {
        let mut stack = CallStack::new();
        for value in [5, 6, 7] {
            stack.push(value);
        }
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![5, 6, 7]);
    }
}
