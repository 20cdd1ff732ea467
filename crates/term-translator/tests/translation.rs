// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use shared_term::{Ident, ModuleName, SortFlags, TermF, TermStore};
use term_translator::prelude::default_treatments;
use term_translator::target::ast::{Binder, Decl, Term};
use term_translator::target::render::{decls_to_string, term_to_string};
use term_translator::{
    translate_definition, translate_term, IdentSpecialTreatment, ModuleTranslator, SpecialTreatmentTable,
    TranslationConfig, TranslationError, TranslatorOptions,
};

fn test_module() -> ModuleName {
    ModuleName::new(["Test"])
}

fn ident(name: &str) -> Ident {
    Ident::new(test_module(), name)
}

fn plain_config() -> TranslationConfig {
    TranslationConfig::new(test_module(), SpecialTreatmentTable::new())
}

fn prelude_config() -> TranslationConfig {
    TranslationConfig::new(test_module(), default_treatments())
}

fn render(config: &TranslationConfig, store: &TermStore, root: shared_term::TermId) -> String {
    let translated = translate_term(config, store, root).unwrap();
    term_to_string(&translated.term)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_word_product_of_literals() {
    let mut store = TermStore::new();
    let width = store.nat(8u32);
    let two = store.bv_lit(8, 2);
    let three = store.bv_lit(8, 3);
    let product = store.apply_prelude("bvMul", [width, two, three]);

    let translated = translate_term(&prelude_config(), &store, product).unwrap();
    assert!(translated.declarations.is_empty());
    assert!(!matches!(translated.term, Term::Let(..)));
    insta::assert_snapshot!(
        term_to_string(&translated.term),
        @"Prelude.bvMul 8 (BitVec.ofNat 8 2) (BitVec.ofNat 8 3)"
    );
}

#[test]
fn test_shared_application_is_bound_once() {
    let mut store = TermStore::new();
    let three = store.nat(3u32);
    let four = store.nat(4u32);
    let e = store.apply_prelude("addNat", [three, four]);
    let f = store.prelude("f");
    let root = store.apply_all(f, [e, e, e]);

    let translated = translate_term(&plain_config(), &store, root).unwrap();
    match &translated.term {
        Term::Let(bindings, body) => {
            assert_eq!(bindings.len(), 1);
            assert_eq!(bindings[0].name, "x");
            assert_eq!(body.args(), &[Term::var("x"), Term::var("x"), Term::var("x")]);
        }
        other => panic!("expected a let, got {:?}", other),
    }
    insta::assert_snapshot!(
        term_to_string(&translated.term),
        @"let x := Prelude.addNat 3 4; Prelude.f x x x"
    );
}

#[test]
fn test_shared_application_uses_prelude_names() {
    let mut store = TermStore::new();
    let three = store.nat(3u32);
    let four = store.nat(4u32);
    let e = store.apply_prelude("addNat", [three, four]);
    let f = store.prelude("f");
    let root = store.apply_all(f, [e, e, e]);

    assert_eq!(
        render(&prelude_config(), &store, root),
        "let x := Nat.add 3 4; Prelude.f x x x"
    );
}

#[test]
fn test_nested_shared_terms_are_ordered_by_dependency() {
    let mut store = TermStore::new();
    let one = store.nat(1u32);
    let inner = store.apply_prelude("addNat", [one, one]);
    let outer = store.apply_prelude("mulNat", [inner, inner]);
    let root = store.apply_prelude("subNat", [outer, outer]);

    assert_eq!(
        render(&plain_config(), &store, root),
        "let x := Prelude.addNat 1 1; let x1 := Prelude.mulNat x x; Prelude.subNat x1 x1"
    );
}

#[test]
fn test_translation_is_deterministic() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let one = store.nat(1u32);
    let shared = store.apply_prelude("addNat", [one, one]);
    let body = store.local(0);
    let body = store.apply_prelude("mulNat", [body, shared]);
    let lam = store.lambda("x", nat, body);
    let root = store.apply_all(lam, [shared]);

    let config = prelude_config();
    let first = render(&config, &store, root);
    let second = render(&config, &store, root);
    assert_eq!(first, second);
    assert_eq!(first, "let x := Nat.add 1 1; (fun (x1 : Nat) => Nat.mul x1 x) x");
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_shared_names_avoid_free_variables() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let three = store.nat(3u32);
    let e = store.apply_prelude("addNat", [three, three]);
    let v = store.variable("x", nat);
    let f = store.prelude("f");
    let root = store.apply_all(f, [e, e, v]);

    assert_eq!(
        render(&plain_config(), &store, root),
        "let x1 := Prelude.addNat 3 3; Prelude.f x1 x1 x"
    );
}

#[test]
fn test_shared_names_carry_into_next_digit() {
    let mut store = TermStore::new();
    let three = store.nat(3u32);
    let e = store.apply_prelude("addNat", [three, three]);
    let f = store.prelude("f");
    let root = store.apply_all(f, [e, e]);

    let options = TranslatorOptions {
        extra_reserved: ["x", "x1", "x2", "x3", "x4", "x5", "x6", "x7", "x8", "x9"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        ..TranslatorOptions::default()
    };
    let config = plain_config().with_options(options);
    assert_eq!(render(&config, &store, root), "let x10 := Prelude.addNat 3 3; Prelude.f x10 x10");
}

#[test]
fn test_bound_names_are_freshened() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let outer_var = store.local(1);
    let inner_var = store.local(0);
    let body = store.apply_prelude("addNat", [outer_var, inner_var]);
    let inner = store.lambda("x", nat, body);
    let outer = store.lambda("x", nat, inner);

    assert_eq!(
        render(&plain_config(), &store, outer),
        "fun (x : Prelude.Nat) (x1 : Prelude.Nat) => Prelude.addNat x x1"
    );
}

#[test]
fn test_bound_names_avoid_reserved_words() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let body = store.local(0);
    let lam = store.lambda("fun", nat, body);
    let weird = store.lambda("3 apples", nat, body);

    assert_eq!(render(&plain_config(), &store, lam), "fun (fun1 : Prelude.Nat) => fun1");
    assert_eq!(render(&plain_config(), &store, weird), "fun (x3_apples : Prelude.Nat) => x3_apples");
}

#[test]
fn test_bound_names_avoid_current_module_globals() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let global = store.global(ident("helper"));
    let var = store.local(0);
    let body = store.apply_all(global, [var]);
    let lam = store.lambda("helper", nat, body);

    assert_eq!(
        render(&plain_config(), &store, lam),
        "fun (helper1 : Prelude.Nat) => helper helper1"
    );
}

#[test]
fn test_bound_names_avoid_emitted_target_names() {
    let mut store = TermStore::new();
    let sort = store.sort(0, SortFlags::none());
    let nat_global = store.prelude("Nat");
    let lam = store.lambda("Nat", sort, nat_global);
    assert_eq!(render(&prelude_config(), &store, lam), "fun (Nat1 : Type) => Nat");

    // Module root of a qualified global
    let nat = store.nat_type();
    let var = store.local(0);
    let f = store.prelude("f");
    let body = store.apply_all(f, [var]);
    let lam = store.lambda("Prelude", nat, body);
    assert_eq!(
        render(&prelude_config(), &store, lam),
        "fun (Prelude1 : Nat) => Prelude.f Prelude1"
    );

    // Heads of term formers, with no treatments configured
    let unit = store.intern(TermF::UnitType);
    let pair_ty = store.intern(TermF::PairType(unit, var));
    let lam = store.lambda("Unit", sort, pair_ty);
    assert_eq!(render(&plain_config(), &store, lam), "fun (Unit1 : Type) => Prod Unit Unit1");
}

// ============================================================================
// Structural cases
// ============================================================================

#[test]
fn test_records_are_canonicalized() {
    let mut store = TermStore::new();
    let one = store.nat(1u32);
    let two = store.nat(2u32);
    let ordered = store.record_value(vec![("a".to_string(), one), ("b".to_string(), two)]);
    let reordered = store.record_value(vec![("b".to_string(), two), ("a".to_string(), one)]);
    assert_ne!(ordered, reordered);

    let config = plain_config();
    let expected = "RecordCons \"a\" 1 (RecordCons \"b\" 2 RecordNil)";
    assert_eq!(render(&config, &store, ordered), expected);
    assert_eq!(render(&config, &store, reordered), expected);

    let nat = store.nat_type();
    let bool_ty = store.bool_type();
    let ty = store.record_type(vec![("y".to_string(), bool_ty), ("x".to_string(), nat)]);
    let proj = store.intern(TermF::RecordProj(reordered, "a".to_string()));
    assert_eq!(
        render(&config, &store, ty),
        "RecordTypeCons \"x\" Prelude.Nat (RecordTypeCons \"y\" Prelude.Bool RecordTypeNil)"
    );
    assert_eq!(render(&config, &store, proj), format!("RecordProj ({}) \"a\"", expected));
}

#[test]
fn test_conditional_applied_to_extra_arguments() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let bool_ty = store.bool_type();
    let fun_ty = store.arrow(nat, nat);
    let cond = store.variable("c", bool_ty);
    let f = store.variable("f", fun_ty);
    let g = store.variable("g", fun_ty);
    let five = store.nat(5u32);
    let root = store.apply_prelude("ite", [fun_ty, cond, f, g, five]);

    assert_eq!(render(&prelude_config(), &store, root), "(if c then f else g) 5");

    // Too few arguments for the structural form
    let partial = store.apply_prelude("ite", [fun_ty, cond, f]);
    assert_eq!(render(&prelude_config(), &store, partial), "@ite (Nat → Nat) c f");
}

#[test]
fn test_conditionals_sharing_a_type_stay_structural() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let word = store.word_type(8);
    let c = store.variable("c", bool_ty);
    let d = store.variable("d", bool_ty);
    let a = store.variable("a", word);
    let b = store.variable("b", word);
    let first = store.apply_prelude("ite", [word, c, a, b]);
    let second = store.apply_prelude("ite", [word, d, b, a]);
    let f = store.prelude("f");
    let root = store.apply_all(f, [first, second]);

    let translated = translate_term(&prelude_config(), &store, root).unwrap();
    assert!(!matches!(translated.term, Term::Let(..)));
    insta::assert_snapshot!(
        term_to_string(&translated.term),
        @"Prelude.f (if c then a else b) (if d then b else a)"
    );
}

#[test]
fn test_shared_conditional_is_bound_whole() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let yes = store.bool_lit(true);
    let one = store.nat(1u32);
    let two = store.nat(2u32);
    let choice = store.apply_prelude("ite", [nat, yes, one, two]);
    let root = store.apply_prelude("addNat", [choice, choice]);

    assert_eq!(
        render(&prelude_config(), &store, root),
        "let x := if true then 1 else 2; Nat.add x x"
    );
}

#[test]
fn test_non_literal_vectors_use_generic_encoding() {
    let mut store = TermStore::new();
    let bool_ty = store.bool_type();
    let b = store.variable("b", bool_ty);
    let t = store.bool_lit(true);
    let vector = store.intern(TermF::ArrayValue {
        elem_ty: bool_ty,
        elems: vec![t, b],
    });
    assert_eq!(render(&plain_config(), &store, vector), "Vector.ofList [true, b]");
}

#[test]
fn test_macro_builds_head_from_leading_arguments() {
    let mut store = TermStore::new();
    let width = store.nat(8u32);
    let five = store.nat(5u32);
    let word = store.apply_prelude("bvNat", [width, five]);
    assert_eq!(render(&prelude_config(), &store, word), "BitVec.ofNat 8 5");

    let bool_ty = store.bool_type();
    let vec_ty = store.vec_type(4, bool_ty);
    assert_eq!(render(&prelude_config(), &store, vec_ty), "Vector Bool 4");
}

#[test]
fn test_macro_with_too_few_arguments_is_an_error() {
    let mut store = TermStore::new();
    let width = store.nat(8u32);
    let partial = store.apply_prelude("bvNat", [width]);
    let err = translate_term(&prelude_config(), &store, partial).unwrap_err();
    assert_eq!(
        err,
        TranslationError::MacroArity {
            ident: Ident::prelude("bvNat"),
            expected: 2,
            actual: 1,
        }
    );
}

#[test]
fn test_shared_partial_macro_application_is_not_lifted() {
    let mut store = TermStore::new();
    let width = store.nat(8u32);
    let two = store.nat(2u32);
    let three = store.nat(3u32);
    let a = store.apply_prelude("bvNat", [width, two]);
    let b = store.apply_prelude("bvNat", [width, three]);
    let root = store.apply_prelude("bvAdd", [width, a, b]);
    assert_eq!(
        render(&prelude_config(), &store, root),
        "Prelude.bvAdd 8 (BitVec.ofNat 8 2) (BitVec.ofNat 8 3)"
    );
}

#[test]
fn test_general_recursion_is_rejected() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let body = store.local(0);
    let fix = store.intern(TermF::Fix {
        name: "loop".to_string(),
        ty: nat,
        body,
    });
    let one = store.nat(1u32);
    let root = store.apply_prelude("addNat", [fix, one]);
    let err = translate_term(&plain_config(), &store, root).unwrap_err();
    assert_eq!(err, TranslationError::GeneralRecursion { name: "loop".to_string() });
}

#[test]
fn test_out_of_range_local_is_an_error() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let var = store.local(1);
    let lam = store.lambda("x", nat, var);
    let err = translate_term(&plain_config(), &store, lam).unwrap_err();
    assert_eq!(err, TranslationError::UnboundVariable { index: 1, depth: 1 });
}

fn color_recursor(store: &mut TermStore, with_green: bool) -> shared_term::TermId {
    let motive = store.global(ident("motive"));
    let zero = store.nat(0u32);
    let one = store.nat(1u32);
    let mut eliminators = vec![(ident("Red"), zero)];
    if with_green {
        eliminators.push((ident("Green"), one));
    }
    store.intern(TermF::Recursor {
        data_type: ident("Color"),
        params: vec![],
        motive,
        ctor_order: vec![ident("Red"), ident("Green")],
        eliminators,
    })
}

#[test]
fn test_recursor_follows_constructor_order() {
    let mut store = TermStore::new();
    let rec = color_recursor(&mut store, true);
    let red = store.intern(TermF::CtorApp {
        ident: ident("Red"),
        params: vec![],
        args: vec![],
    });
    let root = store.app(rec, red);
    assert_eq!(render(&plain_config(), &store, root), "Color.rec motive 0 1 Red");
}

#[test]
fn test_missing_eliminator_becomes_placeholder() {
    let mut store = TermStore::new();
    let rec = color_recursor(&mut store, false);
    assert_eq!(
        render(&plain_config(), &store, rec),
        "Color.rec motive 0 (error \"missing eliminator for Test.Green\")"
    );

    let strict = plain_config().with_options(TranslatorOptions {
        strict_eliminators: true,
        ..TranslatorOptions::default()
    });
    let err = translate_term(&strict, &store, rec).unwrap_err();
    assert_eq!(err, TranslationError::MissingEliminator(ident("Green")));
}

#[test]
fn test_recursor_needs_a_direct_counterpart() {
    let mut store = TermStore::new();
    let rec = color_recursor(&mut store, true);
    let table = SpecialTreatmentTable::new().with(
        ident("Color"),
        IdentSpecialTreatment::macro_use(0, |_| Term::var("Fin 2")),
    );
    let config = TranslationConfig::new(test_module(), table);
    let err = translate_term(&config, &store, rec).unwrap_err();
    assert_eq!(err, TranslationError::RecursorWithoutCounterpart(ident("Color")));
}

// ============================================================================
// Binders
// ============================================================================

#[test]
fn test_flagged_sort_parameters_get_implicit_hypotheses() {
    let mut store = TermStore::new();
    let sort = store.sort(0, SortFlags::inhabited());
    let a = store.local(0);
    let y = store.local(0);
    let inner = store.lambda("y", a, y);
    let lam = store.lambda("a", sort, inner);
    assert_eq!(
        render(&plain_config(), &store, lam),
        "fun (a : Type) {Inh_a : Inhabited a} (y : a) => y"
    );

    let both = store.sort(
        0,
        SortFlags {
            inhabited: true,
            quantifiable: true,
        },
    );
    let v1 = store.local(1);
    let arrow = store.pi("_", a, v1);
    let pi = store.pi("a", both, arrow);
    assert_eq!(
        render(&plain_config(), &store, pi),
        "(a : Type) → {Inh_a : Inhabited a} → {QT_a : QuantType a} → a → a"
    );
}

#[test]
fn test_type_family_parameters_get_higher_order_hypotheses() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let sort = store.sort(0, SortFlags::inhabited());
    let family = store.pi("n", nat, sort);
    let f = store.local(0);
    let lam = store.lambda("f", family, f);
    assert_eq!(
        render(&plain_config(), &store, lam),
        "fun (f : Prelude.Nat → Type) {Inh_f : (n : Prelude.Nat) → Inhabited (f n)} => f"
    );
}

#[test]
fn test_let_binds_a_fresh_name() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let one = store.nat(1u32);
    let v = store.local(0);
    let body = store.apply_prelude("addNat", [v, v]);
    let term = store.let_in("let", nat, one, body);
    assert_eq!(
        render(&plain_config(), &store, term),
        "let let1 : Prelude.Nat := 1; Prelude.addNat let1 let1"
    );
}

// ============================================================================
// Definitions and modules
// ============================================================================

/// `double : Nat → Nat := fun n => mulNat 2 n` as a constant of the test module
fn double_constant(store: &mut TermStore) -> shared_term::TermId {
    let nat = store.nat_type();
    let ty = store.arrow(nat, nat);
    let two = store.nat(2u32);
    let n = store.local(0);
    let body = store.apply_prelude("mulNat", [two, n]);
    let body = store.lambda("n", nat, body);
    store.constant(ident("double"), ty, Some(body))
}

#[test]
fn test_constants_are_declared_once_per_module() {
    let mut store = TermStore::new();
    let double = double_constant(&mut store);
    let three = store.nat(3u32);
    let first = store.app(double, three);
    let four = store.nat(4u32);
    let second = store.app(double, four);

    let config = plain_config();
    let mut module = ModuleTranslator::new(&config);
    let translated = module.translate_term(&store, first).unwrap();
    assert_eq!(term_to_string(&translated.term), "double 3");
    assert_eq!(translated.declarations.len(), 1);
    assert_eq!(
        decls_to_string(&translated.declarations),
        "def double (n : Prelude.Nat) : Prelude.Nat :=\n  Prelude.mulNat 2 n\n"
    );

    let translated = module.translate_term(&store, second).unwrap();
    assert_eq!(term_to_string(&translated.term), "double 4");
    assert!(translated.declarations.is_empty());
    assert_eq!(module.finish().len(), 1);
}

#[test]
fn test_seeded_globals_are_not_declared_again() {
    let mut store = TermStore::new();
    let double = double_constant(&mut store);
    let config = plain_config();
    let mut module = ModuleTranslator::new(&config).with_emitted([ident("double")]);
    let translated = module.translate_term(&store, double).unwrap();
    assert!(translated.declarations.is_empty());
}

#[test]
fn test_opaque_constants_become_axioms() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let opaque = store.constant(ident("seed"), nat, None);
    let translated = translate_term(&plain_config(), &store, opaque).unwrap();
    assert_eq!(
        translated.declarations,
        vec![Decl::Axiom {
            name: "seed".to_string(),
            ty: Term::var("Prelude.Nat"),
        }]
    );
}

#[test]
fn test_definition_site_treatments() {
    let mut store = TermStore::new();
    let double = double_constant(&mut store);

    let replaced = TranslationConfig::new(
        test_module(),
        SpecialTreatmentTable::new().with(ident("double"), IdentSpecialTreatment::replace("def double := Nat.mul 2")),
    );
    let translated = translate_term(&replaced, &store, double).unwrap();
    assert_eq!(translated.declarations, vec![Decl::Snippet("def double := Nat.mul 2".to_string())]);

    let renamed = TranslationConfig::new(
        test_module(),
        SpecialTreatmentTable::new().with(ident("double"), IdentSpecialTreatment::rename("twice")),
    );
    let translated = translate_term(&renamed, &store, double).unwrap();
    assert_eq!(term_to_string(&translated.term), "twice");
    assert_eq!(translated.declarations[0].name(), Some("twice"));

    let macro_only = TranslationConfig::new(
        test_module(),
        SpecialTreatmentTable::new().with(
            ident("double"),
            IdentSpecialTreatment::macro_use(0, |_| Term::var("Nat.double")),
        ),
    );
    let err = translate_term(&macro_only, &store, double).unwrap_err();
    assert_eq!(err, TranslationError::UnspecifiedTreatment(ident("double")));
}

#[test]
fn test_failed_term_leaves_module_state_untouched() {
    let mut store = TermStore::new();
    let double = double_constant(&mut store);
    let nat = store.nat_type();
    let body = store.local(0);
    let fix = store.intern(TermF::Fix {
        name: "loop".to_string(),
        ty: nat,
        body,
    });
    let bad = store.apply_prelude("addNat", [double, fix]);

    let config = plain_config();
    let mut module = ModuleTranslator::new(&config);
    assert!(module.translate_term(&store, bad).is_err());
    assert!(module.globals().declarations().is_empty());

    // The constant is still declared by a later term
    let translated = module.translate_term(&store, double).unwrap();
    assert_eq!(translated.declarations.len(), 1);
}

#[test]
fn test_definition_parameters_follow_lambda_names() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let ty = store.arrow(nat, nat);
    let v = store.local(0);
    let body = store.apply_prelude("addNat", [v, v]);
    let body = store.lambda("m", nat, body);

    let decls = translate_definition(&plain_config(), &store, "twice", ty, body).unwrap();
    assert_eq!(
        decls,
        vec![Decl::Definition {
            name: "twice".to_string(),
            params: vec![Binder {
                name: "m".to_string(),
                ty: Term::var("Prelude.Nat"),
                implicit: false,
            }],
            ty: Some(Term::var("Prelude.Nat")),
            body: Term::app(Term::var("Prelude.addNat"), vec![Term::var("m"), Term::var("m")]),
        }]
    );
}

#[test]
fn test_definition_without_matching_lambdas_has_no_parameters() {
    let mut store = TermStore::new();
    let nat = store.nat_type();
    let ty = store.arrow(nat, nat);
    let succ = store.prelude("succ");

    let decls = translate_definition(&plain_config(), &store, "next", ty, succ).unwrap();
    assert_eq!(
        decls_to_string(&decls),
        "def next : Prelude.Nat → Prelude.Nat :=\n  Prelude.succ\n"
    );
}
