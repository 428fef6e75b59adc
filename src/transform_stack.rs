//! Matrix stack used to compose nested local transforms during scene traversal.
//!
//! The stack always holds at least one matrix. [`TransformStack::push`] duplicates the
//! current top, [`TransformStack::save`] right-multiplies the top by a local transform, and
//! [`TransformStack::pop`] restores the previous level.
//!
//! # Example
//!
//! ```
//! use bathyscope::{Mat4, TransformStack, Vec3};
//!
//! let mut stack = TransformStack::new();
//! stack.push();
//! stack.save(Mat4::from_translation(Vec3::new(0.0, -5.0, 0.0)));
//! stack.save(Mat4::from_scale(Vec3::splat(2.0)));
//! let seabed = stack.top();
//! stack.pop();
//!
//! assert_eq!(stack.depth(), 1);
//! assert_eq!(seabed.transform_point3(Vec3::X), Vec3::new(2.0, -5.0, 0.0));
//! ```

use glam::Mat4;

/// A stack of 4×4 matrices whose top is the accumulated model transform.
#[derive(Clone, Debug)]
pub struct TransformStack {
    matrices: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Creates a stack holding a single identity matrix.
    pub fn new() -> Self {
        Self::with_root(Mat4::IDENTITY)
    }

    /// Creates a stack whose root is `root`.
    pub fn with_root(root: Mat4) -> Self {
        let mut matrices = Vec::with_capacity(16);
        matrices.push(root);
        Self { matrices }
    }

    /// Duplicates the current top.
    pub fn push(&mut self) {
        let top = self.top();
        self.matrices.push(top);
    }

    /// Removes the current top and returns `true`.
    ///
    /// Popping the root is a traversal-balance bug: debug builds panic, release builds leave
    /// the stack untouched and return `false`.
    pub fn pop(&mut self) -> bool {
        debug_assert!(
            self.matrices.len() > 1,
            "transform stack popped below its root"
        );
        if self.matrices.len() > 1 {
            self.matrices.pop();
            true
        } else {
            false
        }
    }

    /// Current accumulated transform.
    pub fn top(&self) -> Mat4 {
        self.matrices.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Replaces the top with `top * local`.
    pub fn save(&mut self, local: Mat4) {
        if let Some(top) = self.matrices.last_mut() {
            *top *= local;
        }
    }

    /// Number of matrices on the stack (1 when fully unwound).
    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    /// Drops every level above the root and resets the root to identity.
    pub fn clear(&mut self) {
        self.matrices.truncate(1);
        if let Some(root) = self.matrices.first_mut() {
            *root = Mat4::IDENTITY;
        }
    }

    /// Runs `f` one level deeper, popping afterwards even if `f` pushes nothing.
    ///
    /// ```
    /// use bathyscope::{Mat4, TransformStack, Vec3};
    ///
    /// let mut stack = TransformStack::new();
    /// let inner = stack.scoped(|s| {
    ///     s.save(Mat4::from_translation(Vec3::Y));
    ///     s.top()
    /// });
    /// assert_eq!(stack.depth(), 1);
    /// assert_eq!(inner.w_axis.y, 1.0);
    /// ```
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push();
        let result = f(self);
        debug_assert_eq!(self.depth(), depth + 1, "unbalanced push/pop inside scope");
        self.pop();
        result
    }
}
