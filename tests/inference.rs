use fuzzy_toolbox::{
    defuzzify, fuzzify, infer, simulate, FuzzyError, FuzzySet, MamdaniInference, Rule, Rules, Variable, Variables,
};
use proptest::prelude::*;

fn temp_and_fan() -> Vec<Variable> {
    vec![
        Variable::input("Temp", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Cold", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::triangular("Hot", [50., 100., 100.]).unwrap()),
        Variable::output("Fan", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Low", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::triangular("High", [50., 100., 100.]).unwrap()),
    ]
}

/// Two inputs and two outputs, with outputs declared between the inputs.
fn tipping() -> Vec<Variable> {
    vec![
        Variable::input("Service", 0. ..=10.)
            .unwrap()
            .with_set(FuzzySet::trapezoidal("Poor", [0., 0., 2., 5.]).unwrap())
            .with_set(FuzzySet::triangular("Good", [2., 5., 8.]).unwrap())
            .with_set(FuzzySet::trapezoidal("Excellent", [5., 8., 10., 10.]).unwrap()),
        Variable::output("Tip", 0. ..=30.)
            .unwrap()
            .with_set(FuzzySet::triangular("Low", [0., 5., 10.]).unwrap())
            .with_set(FuzzySet::triangular("Medium", [10., 15., 20.]).unwrap())
            .with_set(FuzzySet::triangular("High", [20., 25., 30.]).unwrap()),
        Variable::input("Food", 0. ..=10.)
            .unwrap()
            .with_set(FuzzySet::triangular("Rancid", [0., 0., 5.]).unwrap())
            .with_set(FuzzySet::triangular("Delicious", [5., 10., 10.]).unwrap()),
        Variable::output("Wait", 0. ..=60.)
            .unwrap()
            .with_set(FuzzySet::trapezoidal("Short", [0., 0., 10., 20.]).unwrap())
            .with_set(FuzzySet::trapezoidal("Long", [20., 40., 60., 60.]).unwrap()),
    ]
}

const TIPPING_RULES: [&str; 6] = [
    "Service Poor or Food Rancid => Tip Low",
    "Service Good and Service Good => Tip Medium",
    "Service Excellent or Food Delicious => Tip High",
    "Service Excellent and_not Food Rancid => Wait Short",
    "Service Poor or_not Food Delicious => Wait Long",
    "Service Good and Food Rancid => Wait Long",
];

#[test]
fn test_temperature_scenario() {
    let vars = temp_and_fan();
    let outputs = simulate(&vars, &[75.], ["Temp Cold and Temp Cold => Fan Low", "Temp Hot and Temp Hot => Fan High"])
        .unwrap();
    let fan = outputs.get("Fan").unwrap();

    assert_eq!(fan.label, "High");
    assert!(fan.value > 50. && fan.value < 100.);
}

#[test]
fn test_outputs_follow_declaration_order() {
    let vars = tipping();
    let outputs = simulate(&vars, &[9., 7.], TIPPING_RULES).unwrap();
    let pairs = outputs.to_pairs();

    assert_eq!(outputs.iter().map(|o| o.variable.as_str()).collect::<Vec<_>>(), ["Tip", "Wait"]);
    assert_eq!(pairs[0].1, "High");
    assert_eq!(pairs[1].1, "Short");

    // Service 9: Excellent 1, Good 0, Poor 0. Food 7: Rancid 0, Delicious 0.4.
    // Tip: High = max(1, 0.4) = 1, Wait: Short = min(1, 1 - 0) = 1, Long = max(0, 1 - 0.4) = 0.6
    let (in_vars, out_vars) = Variables::partition(&vars);
    let fuzzy_inputs = fuzzify(&in_vars, &[9., 7.]).unwrap();
    let rules = Rules::parse_all(TIPPING_RULES).unwrap();
    let fuzzy_outputs = infer(&rules, &fuzzy_inputs, &in_vars, &out_vars).unwrap();

    approx::assert_relative_eq!(fuzzy_inputs[1][1], 0.4, epsilon = 1e-12);
    assert_eq!(fuzzy_outputs[0], [0., 0., 1.]);
    assert_eq!(fuzzy_outputs[1][0], 1.);
    approx::assert_relative_eq!(fuzzy_outputs[1][1], 0.6, epsilon = 1e-12);

    let wait = defuzzify(&out_vars, &fuzzy_outputs).unwrap().get("Wait").unwrap().value;
    let short = vars[3].sets()[0].centroid();
    let long = vars[3].sets()[1].centroid();

    approx::assert_relative_eq!(wait, (short + 0.6 * long) / 1.6, epsilon = 1e-9);
    approx::assert_relative_eq!(pairs[0].0, 25.);
}

#[test]
fn test_first_failure_aborts_run() {
    let vars = tipping();
    let mut rules = TIPPING_RULES.to_vec();

    rules.push("Service Good => Tip Low");

    assert!(matches!(simulate(&vars, &[5., 5.], &rules), Err(FuzzyError::MalformedRule { tokens: 5, .. })));

    rules.pop();
    rules.insert(0, "Service Good and Food");

    assert!(matches!(
        simulate(&vars, &[5., 5.], &rules),
        Err(FuzzyError::MalformedRule { ref rule, tokens: 4 }) if rule == "Service Good and Food"
    ));

    rules.remove(0);
    rules.push("Service Good AND Food Rancid => Tip Low");

    assert!(matches!(simulate(&vars, &[5., 5.], &rules), Err(FuzzyError::InvalidOperator(ref op)) if op == "AND"));

    rules.pop();
    rules.push("Service Good xor Food Rancid => Tip Low");

    assert!(matches!(simulate(&vars, &[5., 5.], &rules), Err(FuzzyError::InvalidOperator(_))));
}

#[test]
fn test_unreached_output_fails() {
    let vars = tipping();

    // Nothing targets Wait
    let err = simulate(&vars, &[5., 5.], ["Service Good and Service Good => Tip Medium"]).unwrap_err();

    assert!(matches!(err, FuzzyError::NoActivation(ref name) if name == "Wait"));
    assert_eq!(err.to_string(), "No rule activated output variable \"Wait\"");
}

#[test]
fn test_concurrent_callers() {
    let vars = tipping();
    let model = MamdaniInference::new(&vars).unwrap();
    let rules = Rules::parse_all(TIPPING_RULES).unwrap();
    let expected: Vec<_> = (0..=10)
        .map(|s| model.eval(&rules, &vec![s as f64, 3.].into()).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..=10)
            .map(|s| {
                let model = &model;
                let rules = &rules;
                scope.spawn(move || model.eval(rules, &vec![s as f64, 3.].into()).unwrap())
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

proptest! {
    #[test]
    fn prop_triangle_shape(a in -100.0..0.0f64, ab in 0.1..50.0f64, bc in 0.1..50.0f64, t1 in 0.0..1.0f64, t2 in 0.0..1.0f64) {
        let (b, c) = (a + ab, a + ab + bc);
        let set = FuzzySet::triangular("t", [a, b, c]).unwrap();

        prop_assert_eq!(set.membership_degree(a), 0.);
        prop_assert_eq!(set.membership_degree(b), 1.);
        prop_assert_eq!(set.membership_degree(c), 0.);

        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

        prop_assert!(set.membership_degree(a + lo * ab) <= set.membership_degree(a + hi * ab));
        prop_assert!(set.membership_degree(b + lo * bc) >= set.membership_degree(b + hi * bc));
        prop_assert!((set.centroid() - (a + b + c) / 3.).abs() < 1e-9);
    }

    #[test]
    fn prop_trapezoid_plateau(a in -100.0..0.0f64, ab in 0.1..50.0f64, bc in 0.0..50.0f64, cd in 0.1..50.0f64, t in 0.0..=1.0f64) {
        let (b, c, d) = (a + ab, a + ab + bc, a + ab + bc + cd);
        let set = FuzzySet::trapezoidal("t", [a, b, c, d]).unwrap();
        let x = (b + t * (c - b)).clamp(b, c);

        prop_assert_eq!(set.membership_degree(x), 1.);
    }

    #[test]
    fn prop_clamped_outside(points in prop::collection::vec(-100.0..100.0f64, 4), below in 0.0..100.0f64, above in 0.0..100.0f64) {
        let mut points = points;

        points.sort_by(f64::total_cmp);

        let set = FuzzySet::trapezoidal("t", [points[0], points[1], points[2], points[3]]).unwrap();

        prop_assert_eq!(set.membership_degree(points[0] - below), 0.);
        prop_assert_eq!(set.membership_degree(points[3] + above), 0.);
    }

    #[test]
    fn prop_rule_order_is_irrelevant(
        rules in Just(TIPPING_RULES.to_vec()).prop_shuffle(),
        service in 0.0..=10.0f64,
        food in 0.0..=10.0f64,
    ) {
        let vars = tipping();
        let (in_vars, out_vars) = Variables::partition(&vars);
        let fuzzy_inputs = fuzzify(&in_vars, &[service, food]).unwrap();
        let in_order = infer(&Rules::parse_all(TIPPING_RULES).unwrap(), &fuzzy_inputs, &in_vars, &out_vars).unwrap();
        let shuffled: Rules = rules.iter().map(|r| r.parse::<Rule>().unwrap()).collect();

        prop_assert_eq!(infer(&shuffled, &fuzzy_inputs, &in_vars, &out_vars).unwrap(), in_order);
    }
}
