// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{BodyHandle, ContactGroupId};
use crate::math::Vec3;

/// A single contact constraint between two bodies.
///
/// `None` on either side means static, body-less geometry. The normal points
/// from `body_a` towards `body_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// First body.
    pub body_a: Option<BodyHandle>,
    /// Second body.
    pub body_b: Option<BodyHandle>,
    /// World-space contact point.
    pub point: Vec3,
    /// Unit contact normal, from `a` to `b`.
    pub normal: Vec3,
    /// Penetration depth.
    pub depth: f32,
}

/// The contacts produced by one collision pass.
///
/// Lives for exactly one sub-step: the scheduler clears it after integration,
/// whether or not integration succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConstraintSet {
    group: ContactGroupId,
    contacts: Vec<Contact>,
}

impl ContactConstraintSet {
    /// Creates an empty set belonging to `group`.
    pub fn empty(group: ContactGroupId) -> Self {
        Self {
            group,
            contacts: Vec::new(),
        }
    }

    /// The contact group this set was produced for.
    pub fn group(&self) -> ContactGroupId {
        self.group
    }

    /// Appends a contact.
    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Number of contacts currently held.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns `true` if no contacts are held.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Drops every contact, keeping the allocation and the group tag.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Iterates over the contacts.
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }
}

impl Extend<Contact> for ContactConstraintSet {
    fn extend<I: IntoIterator<Item = Contact>>(&mut self, iter: I) {
        self.contacts.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ContactConstraintSet {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
