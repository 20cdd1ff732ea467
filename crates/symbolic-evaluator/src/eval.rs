// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Evaluation of terms to values
//!
//! Evaluation is strict and environment based. Closed nodes that occur more
//! than once under the evaluated root are memoized by `TermId`, so each of them
//! is evaluated at most once per `evaluate` call. Closed nodes may still
//! mention free variables, so the memo starts empty on every call. Constant
//! bodies are kept until a variable is rebound.

use crate::domain::Domain;
use crate::error::{EvalError, EvalResult};
use crate::prims::{default_primitives, PrimFn, PrimTable, Primitive};
use crate::value::{mux, Env, FunValue, Value};
use shared_term::{is_memoizable, shared_terms, Ident, TermF, TermId, TermStore};
use std::collections::{BTreeMap, HashMap, HashSet};

pub struct Evaluator<'s, D: Domain> {
    store: &'s TermStore,
    domain: D,
    prims: PrimTable<D>,
    /// Values that replace globals and constants by name
    overrides: HashMap<Ident, Value<D>>,
    /// Values of free variables
    vars: HashMap<TermId, Value<D>>,
    /// Values of shared nodes in the current pass
    memo: HashMap<TermId, Value<D>>,
    shared: HashSet<TermId>,
    /// Values of constant bodies
    constants: HashMap<TermId, Value<D>>,
}

impl<'s, D: Domain> Evaluator<'s, D> {
    pub fn new(store: &'s TermStore, domain: D) -> Self {
        Self {
            store,
            domain,
            prims: default_primitives(),
            overrides: HashMap::new(),
            vars: HashMap::new(),
            memo: HashMap::new(),
            shared: HashSet::new(),
            constants: HashMap::new(),
        }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn store(&self) -> &'s TermStore {
        self.store
    }

    /// Use `value` for every occurrence of the global or constant `ident`
    pub fn with_override(mut self, ident: Ident, value: Value<D>) -> Self {
        self.overrides.insert(ident, value);
        self
    }

    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (Ident, Value<D>)>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn register_primitive(&mut self, ident: Ident, arity: usize, imp: PrimFn<D>) {
        self.prims.insert(ident, Primitive { arity, imp });
    }

    /// Bind a free `Variable` node to a value
    pub fn bind_variable(&mut self, var: TermId, value: Value<D>) {
        self.vars.insert(var, value);
        self.constants.clear();
    }

    /// Number of nodes memoized by the last pass
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Evaluate a closed term
    pub fn evaluate(&mut self, root: TermId) -> EvalResult<Value<D>> {
        let shared = shared_terms(self.store, root, is_memoizable);
        log::debug!("evaluating {} with {} shared nodes", root, shared.len());
        self.memo.clear();
        self.shared = shared.into_iter().collect();
        self.eval(root, &Env::new())
    }

    pub fn apply(&mut self, fun: Value<D>, arg: Value<D>) -> EvalResult<Value<D>> {
        match fun {
            Value::Fun(FunValue::Closure { lambda, env }) => match self.store.get(lambda) {
                TermF::Lambda { body, .. } => {
                    let mut env = env;
                    env.push_front(arg);
                    self.eval(*body, &env)
                }
                _ => Err(EvalError::NotAFunction("closure over a non-lambda")),
            },
            Value::Fun(FunValue::Partial { prim, mut args }) => {
                args.push(arg);
                self.call_primitive(prim, args)
            }
            Value::Fun(FunValue::Mux {
                cond,
                then_fun,
                else_fun,
            }) => {
                let t = self.apply(*then_fun, arg.clone())?;
                let e = self.apply(*else_fun, arg)?;
                mux(&self.domain, &cond, t, e)
            }
            // Type-level application
            Value::Type => Ok(Value::Type),
            other => Err(EvalError::NotAFunction(other.kind())),
        }
    }

    pub fn apply_all(&mut self, fun: Value<D>, args: impl IntoIterator<Item = Value<D>>) -> EvalResult<Value<D>> {
        args.into_iter().try_fold(fun, |fun, arg| self.apply(fun, arg))
    }

    fn call_primitive(&mut self, prim: Ident, args: Vec<Value<D>>) -> EvalResult<Value<D>> {
        let Primitive { arity, imp } = *self
            .prims
            .get(&prim)
            .ok_or_else(|| EvalError::UnknownPrimitive(prim.clone()))?;
        if args.len() < arity {
            Ok(Value::Fun(FunValue::Partial { prim, args }))
        } else {
            imp(self, args)
        }
    }

    fn global(&mut self, ident: &Ident) -> EvalResult<Value<D>> {
        if let Some(value) = self.overrides.get(ident) {
            return Ok(value.clone());
        }
        if !self.prims.contains_key(ident) {
            return Err(EvalError::UnknownPrimitive(ident.clone()));
        }
        self.call_primitive(ident.clone(), Vec::new())
    }

    pub(crate) fn eval(&mut self, id: TermId, env: &Env<D>) -> EvalResult<Value<D>> {
        if !self.shared.contains(&id) {
            return self.eval_node(id, env);
        }
        if let Some(value) = self.memo.get(&id) {
            return Ok(value.clone());
        }
        let value = self.eval_node(id, env)?;
        self.memo.insert(id, value.clone());
        Ok(value)
    }

    fn eval_node(&mut self, id: TermId, env: &Env<D>) -> EvalResult<Value<D>> {
        let store = self.store;
        match store.get(id) {
            TermF::Global(ident) => self.global(ident),
            TermF::Constant { ident, body, .. } => match (self.overrides.get(ident), body) {
                (Some(value), _) => Ok(value.clone()),
                // Bodies are closed; evaluate each once
                (None, Some(body)) => {
                    if let Some(value) = self.constants.get(body) {
                        return Ok(value.clone());
                    }
                    let value = self.eval(*body, &Env::new())?;
                    self.constants.insert(*body, value.clone());
                    Ok(value)
                }
                (None, None) => self.global(ident),
            },
            TermF::Variable { name, .. } => self
                .vars
                .get(&id)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            TermF::LocalVar(index) => env
                .get(*index)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(format!("#{}", index))),

            TermF::Sort { .. }
            | TermF::UnitType
            | TermF::PairType(..)
            | TermF::RecordType(_)
            | TermF::DataTypeApp { .. }
            | TermF::Pi { .. } => Ok(Value::Type),

            TermF::NatLit(n) => Ok(Value::Nat(n.clone())),
            TermF::StringLit(s) => Ok(Value::String(s.clone())),
            TermF::BoolLit(b) => Ok(Value::Bool(self.domain.lit(*b))),
            TermF::UnitValue => Ok(Value::Unit),

            TermF::App(fun, arg) => {
                if let Some([ty, cond, then_branch, else_branch]) = self.ite_args(id) {
                    let cond = self.eval(cond, env)?;
                    if let Value::Bool(c) = &cond {
                        if let Some(c) = self.domain.as_lit(c) {
                            return self.eval(if c { then_branch } else { else_branch }, env);
                        }
                    }
                    let ite = self.global(&Ident::prelude("ite"))?;
                    let ty = self.eval(ty, env)?;
                    let then_value = self.eval(then_branch, env)?;
                    let else_value = self.eval(else_branch, env)?;
                    return self.apply_all(ite, [ty, cond, then_value, else_value]);
                }
                let fun = self.eval(*fun, env)?;
                let arg = self.eval(*arg, env)?;
                self.apply(fun, arg)
            }

            TermF::PairValue(a, b) => Ok(Value::Pair(Box::new(self.eval(*a, env)?), Box::new(self.eval(*b, env)?))),
            TermF::PairLeft(p) => match self.eval(*p, env)? {
                Value::Pair(a, _) => Ok(*a),
                other => Err(projection_mismatch("left projection", "pair", &other)),
            },
            TermF::PairRight(p) => match self.eval(*p, env)? {
                Value::Pair(_, b) => Ok(*b),
                other => Err(projection_mismatch("right projection", "pair", &other)),
            },

            TermF::RecordValue(fields) => Ok(Value::Record(
                fields
                    .iter()
                    .map(|(name, field)| Ok((name.clone(), self.eval(*field, env)?)))
                    .collect::<EvalResult<BTreeMap<_, _>>>()?,
            )),
            TermF::RecordProj(record, field) => match self.eval(*record, env)? {
                Value::Record(mut fields) => fields.remove(field).ok_or_else(|| EvalError::TypeMismatch {
                    op: format!("projection .{}", field),
                    expected: "record with the field",
                    found: "record without it",
                }),
                other => Err(projection_mismatch(&format!("projection .{}", field), "record", &other)),
            },

            TermF::ArrayValue { elem_ty, elems } => {
                let elems = elems
                    .iter()
                    .map(|elem| self.eval(*elem, env))
                    .collect::<EvalResult<Vec<_>>>()?;
                if elems.is_empty() && store.as_global(*elem_ty) == Some(&Ident::prelude("Bool")) {
                    return Ok(Value::Word(Vec::new()));
                }
                Ok(Value::from_elems(elems))
            }

            // Parameters are erased
            TermF::CtorApp { ident, args, .. } => Ok(Value::Ctor {
                ident: ident.clone(),
                args: args
                    .iter()
                    .map(|arg| self.eval(*arg, env))
                    .collect::<EvalResult<_>>()?,
            }),

            TermF::Lambda { .. } => Ok(Value::Fun(FunValue::Closure {
                lambda: id,
                env: env.clone(),
            })),
            TermF::Let { value, body, .. } => {
                let value = self.eval(*value, env)?;
                let mut env = env.clone();
                env.push_front(value);
                self.eval(*body, &env)
            }

            TermF::Recursor { data_type, .. } => {
                Err(EvalError::Unsupported(format!("recursor for {}", data_type)))
            }
            TermF::Fix { name, .. } => Err(EvalError::Unsupported(format!("general recursion in {}", name))),
        }
    }

    /// Arguments of a saturated `ite` application, unless `ite` is overridden
    fn ite_args(&self, id: TermId) -> Option<[TermId; 4]> {
        let ite = Ident::prelude("ite");
        let (head, args) = match self.store.get(id) {
            TermF::App(..) => self.store.app_spine(id),
            _ => return None,
        };
        if args.len() != 4 || self.store.as_global(head) != Some(&ite) || self.overrides.contains_key(&ite) {
            return None;
        }
        args.try_into().ok()
    }
}

fn projection_mismatch<D: Domain>(op: &str, expected: &'static str, found: &Value<D>) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        expected,
        found: found.kind(),
    }
}
