//! Ordered sequence type for xCDN arrays.

use crate::access::SeqLike;
use crate::{Error, Node, Result};

/// An ordered, 0-indexed sequence of [`Node`]s.
///
/// Any value kind may occupy any slot, and duplicates are allowed. Mutating
/// methods accept `impl Into<Node>` and wrap raw payloads automatically.
///
/// # Examples
///
/// ```rust
/// use xcdn::{Array, Node, Value};
///
/// let mut array = Array::new();
/// array.append(1);
/// array.append("two");
/// array.set(0, Node::new(5)).unwrap();
///
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.get(0).unwrap().value, Value::Int(5));
/// assert!(array.get(2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(Vec<Node>);

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Array(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Array(Vec::with_capacity(capacity))
    }

    /// Returns the node at `index`, failing with [`Error::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&Node> {
        let len = self.0.len();
        self.0
            .get(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    /// Replaces the node at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Node>) -> Result<Node> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn append(&mut self, value: impl Into<Node>) {
        self.0.push(value.into());
    }

    /// Removes the node at `index`, shifting later nodes down.
    pub fn remove(&mut self, index: usize) -> Result<Node> {
        if index < self.0.len() {
            Ok(self.0.remove(index))
        } else {
            Err(Error::index_out_of_range(index, self.0.len()))
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Node> {
        self.0
    }
}

impl SeqLike for Array {
    fn get(&self, index: usize) -> Result<&Node> {
        Array::get(self, index)
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Node> {
        Array::get_mut(self, index)
    }

    fn set(&mut self, index: usize, node: Node) -> Result<Node> {
        Array::set(self, index, node)
    }

    fn append(&mut self, node: Node) {
        Array::append(self, node)
    }

    fn len(&self) -> usize {
        Array::len(self)
    }

    fn iter(&self) -> std::slice::Iter<'_, Node> {
        Array::iter(self)
    }
}

impl From<Vec<Node>> for Array {
    fn from(nodes: Vec<Node>) -> Self {
        Array(nodes)
    }
}

impl FromIterator<Node> for Array {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Array(iter.into_iter().collect())
    }
}

impl IntoIterator for Array {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_auto_wrap_matches_explicit_node() {
        let mut wrapped = Array::from(vec![Node::new(0)]);
        let mut explicit = wrapped.clone();

        wrapped.set(0, 5).unwrap();
        explicit.set(0, Node::new(Value::Int(5))).unwrap();
        assert_eq!(wrapped, explicit);
    }

    #[test]
    fn test_bounds_checking() {
        let array: Array = (0..3).map(Node::new).collect();
        assert!(matches!(
            array.get(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));

        let mut array = array;
        assert!(array.set(3, 1).is_err());
        assert!(array.remove(7).is_err());
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let array: Array = ["a", "b"].into_iter().map(Node::new).collect();
        let first: Vec<_> = array.iter().map(|n| n.value.to_string()).collect();
        let second: Vec<_> = array.iter().map(|n| n.value.to_string()).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_remove_shifts() {
        let mut array: Array = (1..=3).map(Node::new).collect();
        let removed = array.remove(0).unwrap();
        assert_eq!(removed.value, Value::Int(1));
        assert_eq!(array.get(0).unwrap().value, Value::Int(2));
    }
}
