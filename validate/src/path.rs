//! Locations inside a value being validated.
//!
//! A [`Path`] is the sequence of container frames from the root value to the
//! value under inspection. It renders as `list[2].dict['features'].tuple[0]`.
//! Paths are immutable: [`Path::child`] returns a new, extended path.

use std::fmt;

/// One step into a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Element `i` of a list.
    List(usize),
    /// Position `i` of a tuple.
    Tuple(usize),
    /// Value under a dictionary key.
    Dict(String),
    /// Element of an ndarray at a multi-axis index.
    Array(Vec<usize>),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::List(i) => write!(f, "list[{i}]"),
            Frame::Tuple(i) => write!(f, "tuple[{i}]"),
            Frame::Dict(key) => {
                f.write_str("dict['")?;
                for c in key.chars() {
                    if matches!(c, '\\' | '\'') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("']")
            }
            Frame::Array(index) => {
                f.write_str("ndarray[")?;
                for (n, i) in index.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{i}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Location of a value relative to the validated root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Frame>);

impl Path {
    /// The root location.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by one frame.
    #[must_use]
    pub fn child(&self, frame: Frame) -> Self {
        let mut frames = Vec::with_capacity(self.0.len() + 1);
        frames.extend_from_slice(&self.0);
        frames.push(frame);
        Self(frames)
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, frame) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_location() {
        let path = Path::root()
            .child(Frame::List(2))
            .child(Frame::Dict("features".to_owned()))
            .child(Frame::Tuple(0));
        assert_eq!(path.to_string(), "list[2].dict['features'].tuple[0]");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn root_has_a_name() {
        assert_eq!(Path::root().to_string(), "<root>");
        assert_eq!(Path::root().depth(), 0);
    }

    #[test]
    fn array_index_lists_every_axis() {
        let path = Path::root().child(Frame::Array(vec![1, 0]));
        assert_eq!(path.to_string(), "ndarray[1, 0]");
    }

    #[test]
    fn child_leaves_parent_untouched() {
        let parent = Path::root().child(Frame::List(0));
        let child = parent.child(Frame::List(1));
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn quotes_in_keys_are_escaped() {
        let path = Path::root().child(Frame::Dict("it's".to_owned()));
        assert_eq!(path.to_string(), "dict['it\\'s']");
    }

    #[test]
    fn backslashes_in_keys_are_escaped() {
        let trailing = Path::root().child(Frame::Dict("a\\".to_owned()));
        assert_eq!(trailing.to_string(), r"dict['a\\']");
        let quoted = Path::root().child(Frame::Dict(r"a\'".to_owned()));
        assert_eq!(quoted.to_string(), r"dict['a\\\'']");
    }
}
