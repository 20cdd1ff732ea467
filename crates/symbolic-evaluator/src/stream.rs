// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Lazy infinite streams
//!
//! A stream is indexed by natural numbers. Elements are computed on demand
//! and memoized in a binary trie keyed by the bits of the index.

use crate::domain::Domain;
use crate::error::EvalResult;
use crate::eval::Evaluator;
use crate::value::{mux, Value};
use num::BigUint;
use std::cell::RefCell;
use std::rc::Rc;

/// Map from naturals to values, one trie level per index bit (least significant first)
#[derive(Debug, Clone)]
pub struct IndexTrie<V> {
    value: Option<V>,
    children: [Option<Box<IndexTrie<V>>>; 2],
}

impl<V> Default for IndexTrie<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: [None, None],
        }
    }
}

impl<V> IndexTrie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: &BigUint) -> Option<&V> {
        let mut node = self;
        for bit in 0..index.bits() {
            node = node.children[index.bit(bit) as usize].as_deref()?;
        }
        node.value.as_ref()
    }

    pub fn insert(&mut self, index: &BigUint, value: V) {
        let mut node = self;
        for bit in 0..index.bits() {
            node = node.children[index.bit(bit) as usize].get_or_insert_with(Default::default);
        }
        node.value = Some(value);
    }

    pub fn len(&self) -> usize {
        self.value.iter().count()
            + self
                .children
                .iter()
                .flatten()
                .map(|child| child.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub enum StreamSource<D: Domain> {
    /// Function from the index to the element
    Generator(Value<D>),
    /// Pointwise mux of two streams
    Mux {
        cond: D::Bool,
        then_stream: Rc<Stream<D>>,
        else_stream: Rc<Stream<D>>,
    },
}

#[derive(Debug)]
pub struct Stream<D: Domain> {
    source: StreamSource<D>,
    memo: RefCell<IndexTrie<Value<D>>>,
}

impl<D: Domain> Stream<D> {
    pub fn from_generator(generator: Value<D>) -> Self {
        Self::with_source(StreamSource::Generator(generator))
    }

    pub fn muxed(cond: D::Bool, then_stream: Rc<Stream<D>>, else_stream: Rc<Stream<D>>) -> Self {
        Self::with_source(StreamSource::Mux {
            cond,
            then_stream,
            else_stream,
        })
    }

    fn with_source(source: StreamSource<D>) -> Self {
        Self {
            source,
            memo: RefCell::new(IndexTrie::new()),
        }
    }

    /// Element at a concrete index
    pub fn get(&self, ev: &mut Evaluator<'_, D>, index: &BigUint) -> EvalResult<Value<D>> {
        if let Some(value) = self.memo.borrow().get(index) {
            return Ok(value.clone());
        }
        let value = match &self.source {
            StreamSource::Generator(generator) => ev.apply(generator.clone(), Value::Nat(index.clone()))?,
            StreamSource::Mux {
                cond,
                then_stream,
                else_stream,
            } => {
                let t = then_stream.get(ev, index)?;
                let e = else_stream.get(ev, index)?;
                mux(ev.domain(), cond, t, e)?
            }
        };
        self.memo.borrow_mut().insert(index, value.clone());
        Ok(value)
    }

    /// Number of elements computed so far
    pub fn memoized(&self) -> usize {
        self.memo.borrow().len()
    }
}
