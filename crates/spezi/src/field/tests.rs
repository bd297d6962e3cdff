use std::sync::Arc;

use parking_lot::RwLock;
use pretty_assertions::assert_eq;
use spezi_codec::CodecRegistry;
use spezi_tree::{ConfigNode, ConfigTree};

use super::render::common_prefix;
use super::*;
use crate::{FieldDescriptor, TypeCatalog};

fn registry(types: Vec<TypeDescriptor>) -> FieldRegistry {
	let catalog = TypeCatalog::new();
	for ty in types {
		catalog.register(ty);
	}
	FieldRegistry::new("test", Arc::new(catalog), Arc::new(CodecRegistry::new()))
}

fn leaves(tree: &ConfigTree) -> Vec<(String, String)> {
	tree.leaf_values()
}

fn pair(path: &str, value: &str) -> (String, String) {
	(path.to_string(), value.to_string())
}

#[test]
fn discovery_applies_declared_default() {
	static ARMED: RwLock<bool> = RwLock::new(true);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Alarm").with_field(
			FieldDescriptor::global("armed", &ARMED)
				.comment("Alarm armed on start")
				.default_value("false"),
		),
	]);

	let found = reg.discover("t.Alarm", false);

	assert_eq!(found.len(), 1);
	assert_eq!(found[0].current_value, "false");
	assert_eq!(found[0].default_value, "false");
	assert_eq!(found[0].comment, "Alarm armed on start");
	assert!(!*ARMED.read());
}

#[test]
fn discovery_captures_static_without_default() {
	static GAIN: RwLock<f64> = RwLock::new(5.0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Amp").with_field(FieldDescriptor::global("gain", &GAIN)),
	]);

	reg.discover("t.Amp", false);

	let entry = reg.entry(&FieldKey::new("t.Amp", "gain", "")).unwrap();
	assert_eq!(entry.current_value, "5");
	assert_eq!(entry.default_value, "");
	assert!(!entry.is_default());
	assert_eq!(*GAIN.read(), 5.0);
}

#[test]
fn discovery_leaves_unrepresentable_static_untouched() {
	static BIG: RwLock<u64> = RwLock::new(u64::MAX);
	static SMALL: RwLock<u64> = RwLock::new(12);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Counter")
			.with_field(FieldDescriptor::global("big", &BIG))
			.with_field(FieldDescriptor::global("small", &SMALL)),
	]);

	let found = reg.discover("t.Counter", false);

	let names: Vec<_> = found.iter().map(|e| e.field_name.as_str()).collect();
	assert_eq!(names, vec!["small"]);
	assert_eq!(*BIG.read(), u64::MAX);
	assert!(reg.entry(&FieldKey::new("t.Counter", "big", "")).is_none());
	reg.apply_all(None);
	assert_eq!(*BIG.read(), u64::MAX);
}

#[test]
fn discovery_skips_constants_and_foreign_categories() {
	static MAX: u32 = 10;
	static OWN: RwLock<u32> = RwLock::new(1);
	static FOREIGN: RwLock<u32> = RwLock::new(2);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Limits")
			.with_field(FieldDescriptor::constant("max", &MAX))
			.with_field(FieldDescriptor::global("own", &OWN).category("test"))
			.with_field(FieldDescriptor::global("foreign", &FOREIGN).category("other")),
	]);

	let found = reg.discover("t.Limits", false);

	let names: Vec<_> = found.iter().map(|e| e.field_name.as_str()).collect();
	assert_eq!(names, vec!["own"]);
}

#[test]
fn unknown_type_discovers_nothing() {
	let mut reg = registry(Vec::new());
	assert!(reg.discover("t.Nothing", false).is_empty());
	assert!(reg.is_empty());
}

#[test]
fn repeated_discovery_is_idempotent() {
	static LEVEL: RwLock<i32> = RwLock::new(3);
	static MODE: RwLock<String> = RwLock::new(String::new());
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Tank")
			.with_field(
				FieldDescriptor::global("level", &LEVEL)
					.variant("", "1")
					.variant("high", "9"),
			)
			.with_field(FieldDescriptor::global("mode", &MODE).comment("operating mode")),
	]);

	reg.discover("t.Tank", false);
	let once: Vec<FieldEntry> = reg.entries().cloned().collect();
	reg.discover("t.Tank", false);
	let twice: Vec<FieldEntry> = reg.entries().cloned().collect();

	assert_eq!(once, twice);
	assert_eq!(reg.variants(), vec!["", "high"]);
}

#[test]
fn overwriting_discovery_captures_live_value() {
	static ON: RwLock<bool> = RwLock::new(false);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Lamp")
			.with_field(FieldDescriptor::global("on", &ON).default_value("false")),
	]);
	reg.discover("t.Lamp", false);

	*ON.write() = true;
	reg.discover("t.Lamp", true);
	*ON.write() = false;
	reg.apply_all(None);

	assert!(*ON.read());
	let entry = reg.entry(&FieldKey::new("t.Lamp", "on", "")).unwrap();
	assert_eq!(entry.current_value, "true");
	assert_eq!(leaves(&reg.render_minimal()), vec![pair("on", "true")]);
}

#[test]
fn variants_layer_over_the_default() {
	static SPEED: RwLock<f64> = RwLock::new(0.0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Fan").with_field(
			FieldDescriptor::global("speed", &SPEED)
				.variant("", "1")
				.variant("CONF1", "2")
				.variant("CONF2", "3"),
		),
	]);
	reg.discover("t.Fan", false);
	assert_eq!(*SPEED.read(), 1.0);

	reg.apply_variant("", None);
	assert_eq!(*SPEED.read(), 1.0);
	reg.apply_variant("CONF1", None);
	assert_eq!(*SPEED.read(), 2.0);
	reg.apply_variant("CONF2", None);
	assert_eq!(*SPEED.read(), 3.0);
	reg.apply_variant("", None);
	assert_eq!(*SPEED.read(), 1.0);

	// The last known variant wins when everything is applied.
	reg.apply_all(None);
	assert_eq!(*SPEED.read(), 3.0);
}

#[test]
fn applying_unknown_variant_records_it() {
	let mut reg = registry(Vec::new());
	reg.apply_variant("night", None);
	reg.apply_variant("", None);
	assert_eq!(reg.variants(), vec!["", "night"]);
	assert!(reg.remove_variant("night"));
	assert_eq!(reg.variants(), vec![""]);
}

#[test]
fn override_wins_over_variants() {
	static SPEED: RwLock<f64> = RwLock::new(0.0);
	static LEVEL: RwLock<i32> = RwLock::new(0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Fan")
			.with_field(
				FieldDescriptor::global("speed", &SPEED)
					.variant("", "1")
					.variant("CONF1", "2"),
			)
			.with_field(FieldDescriptor::global("level", &LEVEL).default_value("5")),
	]);
	reg.discover("t.Fan", false);
	reg.apply_variant("CONF1", None);
	assert_eq!(*SPEED.read(), 2.0);

	assert_eq!(reg.override_type("t.Fan", "speed", "42"), 2);
	assert_eq!(*SPEED.read(), 42.0);
	assert_eq!(reg.override_type("t.Fan", "level", "7"), 1);
	assert_eq!(*LEVEL.read(), 7);

	reg.apply_variant("CONF1", None);
	assert_eq!(*SPEED.read(), 42.0);
	assert_eq!(*LEVEL.read(), 7);

	assert_eq!(reg.override_type("t.Fan", "missing", "1"), 0);
}

#[test]
fn ingested_values_survive_discovery() {
	static PRESSURE: RwLock<u32> = RwLock::new(0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Pump")
			.with_field(FieldDescriptor::global("pressure", &PRESSURE).default_value("10")),
	]);
	let root = ConfigNode::new("t.Pump").with_attribute("base", "t.Pump");
	let mut tree = ConfigTree::from_root(root);
	tree.add_value(["pressure"], "25");

	reg.ingest(&tree);
	let entry = reg.entry(&FieldKey::new("t.Pump", "pressure", "")).unwrap();
	assert_eq!(entry.value_type, None);
	assert_eq!(entry.default_value, "");
	// No declared type yet, so nothing to render.
	assert!(reg.render_effective().is_empty());

	reg.discover("t.Pump", false);
	let entry = reg.entry(&FieldKey::new("t.Pump", "pressure", "")).unwrap();
	assert_eq!(entry.current_value, "25");
	assert_eq!(entry.default_value, "10");
	assert!(entry.value_type.is_some());

	reg.apply_all(None);
	assert_eq!(*PRESSURE.read(), 25);
}

#[test]
fn ingestion_tolerates_vanished_fields_and_types() {
	static OPEN: RwLock<bool> = RwLock::new(false);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Valve").with_field(FieldDescriptor::global("open", &OPEN)),
	]);
	let mut tree = ConfigTree::from_root(ConfigNode::new("t").with_attribute("base", "t"));
	tree.add_value(["Valve", "gone"], "1");
	tree.add_value(["Removed", "x"], "1");
	tree.add_value(["stray"], "1");

	reg.ingest(&tree);

	assert!(reg.is_empty());
}

#[test]
fn bad_stored_value_leaves_field_unchanged() {
	static COUNT: RwLock<i32> = RwLock::new(4);
	static RATE: RwLock<i32> = RwLock::new(0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.Meter")
			.with_field(FieldDescriptor::global("count", &COUNT).default_value("4"))
			.with_field(FieldDescriptor::global("rate", &RATE).default_value("1")),
	]);
	reg.discover("t.Meter", false);
	let root = ConfigNode::new("t.Meter").with_attribute("base", "t.Meter");
	let mut tree = ConfigTree::from_root(root);
	tree.add_value(["count"], "many");
	tree.add_value(["rate"], "7");

	reg.ingest(&tree);
	reg.apply_all(None);

	assert_eq!(*COUNT.read(), 4);
	assert_eq!(*RATE.read(), 7);
}

#[test]
fn minimal_render_omits_defaults() {
	static RPM: RwLock<u32> = RwLock::new(0);
	static OPEN: RwLock<bool> = RwLock::new(false);
	let mut reg = registry(vec![
		TypeDescriptor::new("plant.pumps.Pump")
			.with_field(FieldDescriptor::global("rpm", &RPM).comment("speed").default_value("900")),
		TypeDescriptor::new("plant.valves.Valve")
			.with_field(
				FieldDescriptor::global("open", &OPEN)
					.comment("a <b> & c")
					.default_value("false"),
			),
	]);
	reg.discover("plant.valves.Valve", false);
	reg.discover("plant.pumps.Pump", false);

	let effective = reg.render_effective();
	assert_eq!(effective.root().name(), "plant");
	assert_eq!(effective.root().attribute("base"), Some("plant"));
	assert_eq!(
		leaves(&effective),
		vec![pair("pumps.Pump.rpm", "900"), pair("valves.Valve.open", "false")]
	);
	let open = effective.find(["valves", "Valve", "open"]).unwrap();
	assert_eq!(open.attribute("comment"), Some("a &lt;b&gt; &amp; c"));
	assert_eq!(open.attribute("class"), Some("bool"));

	assert!(reg.render_minimal().is_empty());

	reg.override_type("plant.pumps.Pump", "rpm", "1200");
	let minimal = reg.render_minimal();
	assert_eq!(minimal.root().attribute("base"), Some("plant.pumps.Pump"));
	assert_eq!(leaves(&minimal), vec![pair("rpm", "1200")]);
	let rpm = minimal.find(["rpm"]).unwrap();
	assert_eq!(rpm.attribute("comment"), None);
	assert_eq!(rpm.attribute("class"), None);
}

#[test]
fn render_sorts_case_insensitively_and_keeps_variant_order() {
	static A: RwLock<i32> = RwLock::new(0);
	static B: RwLock<i32> = RwLock::new(0);
	let mut reg = registry(vec![
		TypeDescriptor::new("t.x.beta")
			.with_field(FieldDescriptor::global("A", &A).default_value("1")),
		TypeDescriptor::new("t.x.Alpha").with_field(
			FieldDescriptor::global("b", &B)
				.variant("", "1")
				.variant("z", "2")
				.variant("a", "3"),
		),
	]);
	reg.discover("t.x.beta", false);
	reg.discover("t.x.Alpha", false);

	assert_eq!(
		leaves(&reg.render_effective()),
		vec![
			pair("Alpha.b", "1"),
			pair("Alpha.b:z", "2"),
			pair("Alpha.b:a", "3"),
			pair("beta.A", "1"),
		]
	);
}

#[test]
fn minimal_render_round_trips_through_ingestion() {
	static RPM: RwLock<u32> = RwLock::new(0);
	static GRADE: RwLock<String> = RwLock::new(String::new());
	let types = || {
		vec![
			TypeDescriptor::new("t.Pump")
				.with_field(FieldDescriptor::global("rpm", &RPM).default_value("900")),
			TypeDescriptor::new("t.Pump.Seal").with_field(
				FieldDescriptor::global("grade", &GRADE)
					.default_value("soft")
					.variant_name("")
					.variant("wet", "hard"),
			),
		]
	};
	let mut reg = registry(types());
	reg.discover("t.Pump", false);
	reg.discover("t.Pump.Seal", false);
	reg.override_type("t.Pump", "rpm", "1500");
	reg.override_type("t.Pump.Seal", "grade", "<steel>");
	let saved = reg.render_minimal();
	assert_eq!(
		leaves(&saved),
		vec![
			pair("rpm", "1500"),
			pair("Seal.grade", "&lt;steel&gt;"),
			pair("Seal.grade:wet", "&lt;steel&gt;"),
		]
	);

	*RPM.write() = 0;
	GRADE.write().clear();
	let mut fresh = registry(types());
	fresh.ingest(&saved);
	fresh.discover("t.Pump", false);
	fresh.discover("t.Pump.Seal", false);
	fresh.apply_all(None);

	let values: Vec<_> = fresh
		.entries()
		.filter(|e| !e.is_default())
		.map(|e| (e.key().to_string(), e.current_value.clone()))
		.collect();
	assert_eq!(
		values,
		vec![
			pair("t.Pump.rpm", "1500"),
			pair("t.Pump.Seal.grade", "<steel>"),
			pair("t.Pump.Seal.grade:wet", "<steel>"),
		]
	);
	assert_eq!(*RPM.read(), 1500);
	assert_eq!(*GRADE.read(), "<steel>");
}

#[test]
fn field_sharing_a_name_with_a_nested_type_round_trips() {
	static STAGE: RwLock<i32> = RwLock::new(0);
	static DEPTH: RwLock<i32> = RwLock::new(0);
	let types = || {
		vec![
			TypeDescriptor::new("t.Mixer")
				.with_field(FieldDescriptor::global("Stage", &STAGE).default_value("1")),
			TypeDescriptor::new("t.Mixer.Stage")
				.with_field(FieldDescriptor::global("depth", &DEPTH).default_value("2")),
		]
	};
	let mut reg = registry(types());
	reg.discover("t.Mixer", false);
	reg.discover("t.Mixer.Stage", false);
	reg.override_type("t.Mixer", "Stage", "5");
	reg.override_type("t.Mixer.Stage", "depth", "7");
	let saved = reg.render_minimal();
	let shared = saved.root().child("Stage").unwrap();
	assert_eq!(shared.value(), Some("5"));
	assert_eq!(shared.child("depth").and_then(ConfigNode::value), Some("7"));

	*STAGE.write() = 0;
	*DEPTH.write() = 0;
	let mut fresh = registry(types());
	fresh.ingest(&saved);
	fresh.discover("t.Mixer", false);
	fresh.discover("t.Mixer.Stage", false);
	fresh.apply_all(None);

	assert_eq!(*STAGE.read(), 5);
	assert_eq!(*DEPTH.read(), 7);
}

struct Machine {
	hours: u32,
}

crate::impl_configurable!(Machine, "t.Machine");

struct Drill {
	machine: Machine,
	rpm: u32,
}

crate::impl_configurable!(Drill, "t.Drill", base: machine);

fn machine_types() -> Vec<TypeDescriptor> {
	vec![
		TypeDescriptor::new("t.Machine").with_field(
			FieldDescriptor::member::<Machine, u32>("hours", |m| &m.hours, |m| &mut m.hours)
				.default_value("10"),
		),
		TypeDescriptor::new("t.Drill").extends("t.Machine").with_field(
			FieldDescriptor::member::<Drill, u32>("rpm", |d| &d.rpm, |d| &mut d.rpm)
				.variant("", "900")
				.variant("eco", "600"),
		),
	]
}

#[test]
fn instance_apply_reaches_ancestor_parts() {
	let mut reg = registry(machine_types());
	let found = reg.discover("t.Drill", false);
	assert_eq!(found.len(), 3);

	let mut drill = Drill {
		machine: Machine { hours: 0 },
		rpm: 0,
	};
	// Process-wide passes never touch instance fields.
	reg.apply_all(None);
	assert_eq!((drill.rpm, drill.machine.hours), (0, 0));

	reg.apply_variant("", Some(&mut drill));
	assert_eq!((drill.rpm, drill.machine.hours), (900, 10));
	reg.apply_variant("eco", Some(&mut drill));
	assert_eq!((drill.rpm, drill.machine.hours), (600, 10));

	let mut machine = Machine { hours: 0 };
	reg.apply_all(Some(&mut machine));
	assert_eq!(machine.hours, 10);
}

#[test]
fn instance_override_applies_to_target() {
	let mut reg = registry(machine_types());
	reg.discover("t.Drill", false);
	let mut drill = Drill {
		machine: Machine { hours: 0 },
		rpm: 0,
	};

	assert_eq!(reg.override_instance(&mut drill, "hours", "77"), 1);
	assert_eq!(drill.machine.hours, 77);
	assert_eq!(reg.override_instance(&mut drill, "rpm", "1000"), 2);
	assert_eq!(drill.rpm, 1000);
}

#[test]
fn ancestry_cycles_are_cut() {
	let reg = registry(vec![
		TypeDescriptor::new("t.A").extends("t.B"),
		TypeDescriptor::new("t.B").extends("t.A"),
	]);
	assert_eq!(reg.chain_names("t.A"), vec!["t.A".to_string(), "t.B".to_string()]);
}

#[test]
fn common_prefix_is_segment_wise() {
	assert_eq!(common_prefix("a.bc.D", "a.bc.E"), "a.bc");
	assert_eq!(common_prefix("a.bc.D", "a.b.D"), "a");
	assert_eq!(common_prefix("x.Y", "z.Y"), "");
	assert_eq!(common_prefix("a.B", "a.B"), "a.B");
}
