use fuzzy_toolbox::{CrispInput, FuzzyError, FuzzySet, Project, Variable};

fn fan_project() -> Project {
    let mut project = Project::new("Fan controller");

    project.description = "Cooling fan driven by temperature\n".into();
    project.set_variables(&[
        Variable::input("Temp", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Cold", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::trapezoidal("Warm", [25., 40., 60., 75.]).unwrap())
            .with_set(FuzzySet::triangular("Hot", [50., 100., 100.]).unwrap()),
        Variable::output("Fan", 0. ..=100.)
            .unwrap()
            .with_set(FuzzySet::triangular("Low", [0., 0., 50.]).unwrap())
            .with_set(FuzzySet::triangular("High", [50., 100., 100.]).unwrap()),
    ]);
    project.rules = "# IN_variable set operator IN_variable set => OUT_variable set\n\
                     Temp Cold or Temp Warm => Fan Low\n\
                     Temp Hot and_not Temp Warm => Fan High # full speed\n"
        .into();
    project.inputs = vec![CrispInput::Text("80".into())];
    project
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = fan_project();
    let outputs = project.simulate().unwrap();

    project.record_outputs(&outputs);

    let path = project.save(dir.path().join("fan")).unwrap();

    assert_eq!(path, dir.path().join("fan.json"));

    let loaded = Project::load(&path).unwrap();

    assert_eq!(loaded, project);
    assert_eq!(loaded.variables().unwrap()[0].sets()[1].points(), [25., 40., 60., 75.]);
    assert_eq!(loaded.simulate().unwrap(), outputs);
    assert!(loaded.outputs[0].ends_with("(High)"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["variables"][0]["type"], "IN");
    assert_eq!(json["variables"][1]["fuzzySets"][0]["type"], "TRI");
    assert_eq!(json["variables"][0]["fuzzySets"][1]["type"], "TRAP");
    assert_eq!(json["variables"][0]["limits"], serde_json::json!([0.0, 100.0]));
    assert_eq!(json["inputs"], serde_json::json!(["80"]));
}

#[test]
fn test_save_keeps_json_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = fan_project().save(dir.path().join("fan.json")).unwrap();

    assert_eq!(path, dir.path().join("fan.json"));
    assert!(path.exists());
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(Project::load(dir.path().join("missing.json")), Err(FuzzyError::Io(_))));

    let path = dir.path().join("broken.json");

    std::fs::write(&path, "{\"variables\": [").unwrap();

    assert!(matches!(Project::load(&path), Err(FuzzyError::Json(_))));
}

#[test]
fn test_unknown_reference_in_project() {
    let mut project = fan_project();

    project.rules.push_str("Temp Freezing or Temp Cold => Fan Low\n");

    assert!(matches!(
        project.simulate(),
        Err(FuzzyError::UnknownFuzzySet { variable, set }) if variable == "Temp" && set == "Freezing"
    ));
}
