//! `PropertyBag`: an ordered sequence of properties used for call args and
//! reply payloads. Order is protocol-visible — positional args, positional
//! reply props — so this wraps a `SmallVec` rather than reordering for any
//! storage convenience.

use smallvec::SmallVec;
use std::ops::{Deref, DerefMut};

use crate::info::PropertyInfo;
use crate::value::Property;

/// Most calls pass a handful of properties; inlining four avoids a heap
/// allocation for the common case while falling back transparently for
/// larger bags.
pub type PropertyBag = SmallVecBag;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmallVecBag(SmallVec<[Property; 4]>);

impl SmallVecBag {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self(SmallVec::with_capacity(cap))
    }
}

impl Deref for SmallVecBag {
    type Target = [Property];
    fn deref(&self) -> &[Property] {
        &self.0
    }
}

impl DerefMut for SmallVecBag {
    fn deref_mut(&mut self) -> &mut [Property] {
        &mut self.0
    }
}

impl FromIterator<Property> for SmallVecBag {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Property> for SmallVecBag {
    fn extend<I: IntoIterator<Item = Property>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for SmallVecBag {
    type Item = Property;
    type IntoIter = smallvec::IntoIter<[Property; 4]>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SmallVecBag {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl SmallVecBag {
    pub fn push(&mut self, prop: Property) {
        self.0.push(prop);
    }

    pub fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }
}

/// Returns the first property in `bag` whose descriptor name matches
/// `info`'s, if any.
pub fn get<'a>(bag: &'a [Property], info: &PropertyInfo) -> Option<&'a Property> {
    bag.iter().find(|p| p.info().name() == info.name())
}

/// Writes `prop` at `index`, extending the bag with empty properties as
/// needed. Returns `true` if the bag's observable contents changed: the
/// index was new, the type at that index differed, or the value differed.
pub fn update(bag: &mut SmallVecBag, index: usize, prop: Property) -> bool {
    if index >= bag.0.len() {
        bag.0.resize(index + 1, Property::empty());
        bag.0[index] = prop;
        return true;
    }

    let existing = &bag.0[index];
    if existing.ty() != prop.ty() || *existing != prop {
        bag.0[index] = prop;
        true
    } else {
        false
    }
}
