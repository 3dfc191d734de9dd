use flow_valve_core::command::{CommandSession, DialogInput, InputId};
use flow_valve_core::construction::{ConstructionPlan, ConstructionStep, RecordingService};
use flow_valve_core::geometry::CircularCut;
use flow_valve_core::geometry::{ApproxEq, Extent, FeatureOperation, GeometryParameters, Point3, Vector3};
use flow_valve_core::params::{FlowValveDefaults, FlowValveSpec, ParameterError};

fn default_params() -> GeometryParameters {
    FlowValveSpec::new().into_construction_parameters().unwrap()
}

#[test]
fn test_default_bundle_dimensions() {
    let p = default_params();
    let half_p = p.transducer_distance / 2.0;

    // Sensor pipe, d = 15
    assert!(p.sensor_pipe.ring.outer_radius.approx_eq(&7.5));
    assert!(p.sensor_pipe.ring.inner_radius.approx_eq(&6.0));
    assert_eq!(p.sensor_pipe.extent, Extent::Symmetric(half_p + 70.0));
    assert!(p.sensor_bore.radius.approx_eq(&6.0));
    assert_eq!(p.sensor_bore.extent, Extent::Symmetric(half_p + 210.0));
    assert_eq!(p.sensor_bore.operation, FeatureOperation::Cut);

    // Main pipe, D = 40, L = 100
    assert!(p.main_pipe.ring.outer_radius.approx_eq(&20.0));
    assert!(p.main_pipe.ring.inner_radius.approx_eq(&16.0));
    assert_eq!(p.main_pipe.extent, Extent::Symmetric(50.0));
    assert_eq!(p.main_pipe.operation, FeatureOperation::Join);
    assert!(p.main_clearing.radius.approx_eq(&20.0));
    assert_eq!(p.main_clearing.extent, Extent::Symmetric(50.0));
    assert_eq!(p.main_clearing.operation, FeatureOperation::Cut);

    let [right, left] = &p.main_flanges;
    assert!(right.ring.outer_radius.approx_eq(&40.0));
    assert_eq!(right.extent, Extent::OneSided(8.0));
    assert_eq!(left.extent, Extent::OneSided(-8.0));
    assert!(right.bolts.circle_radius.approx_eq(&32.0));
    assert_eq!(right.bolts.hole_radius, 3.0);
    assert_eq!(right.bolts.count, 6);
    assert!(right.plane.origin.approx_eq(&Point3::new(0.0, 0.0, 50.0)));
    assert!(left.plane.origin.approx_eq(&Point3::new(0.0, 0.0, -50.0)));
}

#[test]
fn test_sensor_flanges_sit_at_pipe_ends() {
    let p = default_params();
    let end = p.transducer_distance / 2.0 + 70.0;
    let [top, bottom] = &p.sensor_flanges;

    assert!(top.offset.approx_eq(&end));
    assert!(bottom.offset.approx_eq(&-end));
    assert!(p.sensor_pipe.plane.signed_distance(&top.plane.origin).approx_eq(&end));
    assert!(top.ring.outer_radius.approx_eq(&13.5));
    assert!(top.bolts.circle_radius.approx_eq(&10.0));
    assert_eq!(top.bolts.hole_radius, 2.0);
    assert_eq!(top.bolts.cut, Extent::Symmetric(3.0));
    assert_eq!(top.bolts.hole_centers().len(), 6);
}

#[test]
fn test_sensor_axis_follows_angle() {
    let p = default_params();
    let theta = 70f64.to_radians();
    let expected = Vector3::new(0.0, -theta.sin(), theta.cos());
    assert!(p.sensor_pipe.axis().approx_eq(&expected));
    assert!(p.sensor_pipe.plane_angle.approx_eq(&theta));
}

#[test]
fn test_ball_valve_stack() {
    let p = default_params();
    let half_p = p.transducer_distance / 2.0;
    let valve = &p.ball_valve;

    assert!(valve.lower_flange.offset.approx_eq(&(half_p + 71.0)));
    assert_eq!(valve.lower_flange.extent, Extent::OneSided(2.0));
    assert!(valve.pipe.offset.approx_eq(&(half_p + 72.0)));
    assert_eq!(valve.pipe.extent, Extent::OneSided(30.0));
    assert!(valve.housing.ring.outer_radius.approx_eq(&13.5));
    assert!(valve.housing.ring.inner_radius.approx_eq(&7.5));
    assert_eq!(valve.housing.operation, FeatureOperation::Join);
    assert!(valve.ball.radius.approx_eq(&6.0));
    assert!(valve.ball.bore_radius.approx_eq(&3.75));
    assert_eq!(valve.ball.bore, Extent::Symmetric(7.5));
    assert!(valve.upper_flange.offset.approx_eq(&(half_p + 102.0)));
}

#[test]
fn test_lever_plane_is_quarter_turn_past_sensor() {
    let p = default_params();
    let expected = 70f64.to_radians() + std::f64::consts::FRAC_PI_2;
    assert!(p.lever.base_plane_angle.approx_eq(&expected));
    assert!(p.lever.base_plane.normal.dot(&p.sensor_pipe.axis()).approx_eq(&0.0));
    assert!(p.lever.handle.is_closed(1e-3));
}

#[test]
fn test_all_default_lengths_positive() {
    for (name, value) in default_params().lengths() {
        assert!(value.is_finite() && value > 0.0, "{} = {}", name, value);
    }
}

#[test]
fn test_plan_order() {
    let plan = ConstructionPlan::from_parameters(&default_params());
    assert_eq!(
        plan.labels(),
        vec![
            "sensor pipe",
            "sensor top",
            "sensor bottom",
            "main pipe clearing",
            "main pipe",
            "sensor bore",
            "main right",
            "main left",
            "valve lower",
            "valve pipe",
            "valve housing",
            "ball",
            "valve upper",
            "lever base",
            "lever handle",
        ]
    );
}

#[test]
fn test_main_pipe_cleared_before_join_and_bored_after() {
    let params = default_params();
    let plan = ConstructionPlan::from_parameters(&params);
    let labels = plan.labels();
    let position = |label: &str| labels.iter().position(|l| *l == label).unwrap();

    assert!(position("sensor pipe") < position("main pipe clearing"));
    assert!(position("main pipe clearing") < position("main pipe"));
    assert!(position("main pipe") < position("sensor bore"));

    let cuts: Vec<&CircularCut> = plan
        .steps
        .iter()
        .filter_map(|step| match step {
            ConstructionStep::MainPipeClearing(cut) | ConstructionStep::SensorBore(cut) => Some(cut),
            _ => None,
        })
        .collect();
    assert_eq!(cuts.len(), 2);
    assert!(cuts.iter().all(|cut| cut.operation == FeatureOperation::Cut));

    // The clearing covers the whole main cross-section; the bore only the
    // sensor pipe's inner circle, but reaches past the main pipe wall.
    assert!(cuts[0].radius.approx_eq(&(params.main_diameter / 2.0)));
    assert!(cuts[1].radius.approx_eq(&params.sensor_pipe.ring.inner_radius));
    assert!(cuts[1].extent.distance() > params.transducer_distance / 2.0 + 70.0);

    let json = plan.to_json().unwrap();
    assert_eq!(json.matches(r#""operation":"Cut""#).count(), 2);
}

#[test]
fn test_component_name() {
    assert_eq!(default_params().component_name, "Flow-valve (D40.0cm θ70.0deg)");

    let mut spec = FlowValveSpec::new();
    spec.set_main_diameter(32.5).unwrap();
    spec.set_angle(45f64.to_radians()).unwrap();
    let params = spec.into_construction_parameters().unwrap();
    assert_eq!(params.component_name, "Flow-valve (D32.5cm θ45.0deg)");
    assert_eq!(
        ConstructionPlan::from_parameters(&params).component_name,
        params.component_name
    );
}

#[test]
fn test_plan_json_round_trip() {
    let plan = ConstructionPlan::from_parameters(&default_params());
    let json = plan.to_json().unwrap();
    assert!(json.contains(r#""kind":"SensorPipe""#));

    let restored: ConstructionPlan = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), plan.len());
    assert_eq!(restored.component_name, plan.component_name);
    match &restored.steps[6] {
        ConstructionStep::Flange(flange) => assert_eq!(flange.label, "main right"),
        other => panic!("unexpected step {:?}", other),
    }
}

#[test]
fn test_hole_count_flows_to_every_flange() {
    let mut spec = FlowValveSpec::new();
    spec.set_hole_count(9.0).unwrap();
    let params = spec.into_construction_parameters().unwrap();

    assert_eq!(params.flanges().count(), 6);
    assert!(params.flanges().all(|f| f.bolts.count == 9));
}

#[test]
fn test_zero_holes_never_reach_construction() {
    let mut session = CommandSession::new(&FlowValveDefaults::default()).unwrap();
    let err = session
        .apply_input(DialogInput::new(InputId::HoleCount, 0.0))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_DIMENSION");

    let mut service = RecordingService::new();
    assert!(session.execute(&mut service).is_err());
    assert!(session.parameters().is_none());
    assert!(service.applied.is_empty());
}

#[test]
fn test_full_command_invocation() {
    let mut session = CommandSession::new(&FlowValveDefaults::default()).unwrap();
    let errors = session.apply_inputs([
        DialogInput::parse("theta", 60.0).unwrap(),
        DialogInput::parse("D", 30.0).unwrap(),
        DialogInput::parse("L", 150.0).unwrap(),
        DialogInput::parse("RH", 2.0).unwrap(),
        DialogInput::parse("H", 4.0).unwrap(),
    ]);
    assert!(errors.is_empty());
    assert_eq!(session.readouts().wall_thickness, "~ 3 cm");

    let mut service = RecordingService::new();
    let plan = session.execute(&mut service).unwrap();
    assert_eq!(service.labels(), plan.labels());

    let params = session.parameters().unwrap();
    assert!(params.transducer_distance.approx_eq(&(30.0 / 60f64.to_radians().sin())));
    assert_eq!(params.main_flanges[0].bolts.count, 4);
    assert_eq!(params.main_pipe.extent, Extent::Symmetric(75.0));
}

#[test]
fn test_degenerate_angle_scenario() {
    let mut spec = FlowValveSpec::new();
    spec.set_main_diameter(40.0).unwrap();
    spec.set_angle(70f64.to_radians()).unwrap();
    let last_valid = spec.transducer_distance();

    let err = spec.set_angle(std::f64::consts::PI).unwrap_err();
    assert!(matches!(err, ParameterError::DegenerateAngle { .. }));
    assert_eq!(spec.transducer_distance(), last_valid);
}

#[test]
fn test_bundle_json_round_trip() {
    let params = default_params();
    let json = params.to_json().unwrap();
    let restored: GeometryParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.hole_count, params.hole_count);
    assert!(restored.transducer_distance.approx_eq(&params.transducer_distance));
    assert_eq!(restored.lever.handle, params.lever.handle);
}
