//! Where the resolved theme is made visible.
//!
//! A surface receives a class label for the active theme and the label of the
//! theme it replaces. It is written to, never read back.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Root presentation surface accepting a theme class label.
pub trait ThemeSurface {
    /// Adds `class` and removes `stale`.
    fn apply(&mut self, class: &str, stale: &str);
}

impl<S: ThemeSurface + ?Sized> ThemeSurface for Box<S> {
    fn apply(&mut self, class: &str, stale: &str) {
        (**self).apply(class, stale)
    }
}

/// Surface that discards every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl ThemeSurface for NoSurface {
    fn apply(&mut self, _class: &str, _stale: &str) {}
}

/// Class list of a root element.
///
/// Classes the host set for other reasons are left alone. Clones share the
/// same list, so the host can keep one to render from.
///
/// # Example
///
/// ```rust
/// use theme_switch::{RootClasses, ThemeSurface};
///
/// let mut root = RootClasses::from_classes(["antialiased", "light"]);
/// root.apply("dark", "light");
/// assert_eq!(root.class_attr(), "antialiased dark");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RootClasses {
    classes: Rc<RefCell<BTreeSet<String>>>,
}

impl RootClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: Rc::new(RefCell::new(classes.into_iter().map(Into::into).collect())),
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// Space-separated class attribute value, sorted.
    pub fn class_attr(&self) -> String {
        self.classes
            .borrow()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ThemeSurface for RootClasses {
    fn apply(&mut self, class: &str, stale: &str) {
        let mut classes = self.classes.borrow_mut();
        if class != stale {
            classes.remove(stale);
        }
        classes.insert(class.to_string());
    }
}
