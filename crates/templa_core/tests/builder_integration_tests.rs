//! Integration tests for staged builders.

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use serde_yaml::Value;
use tempfile::tempdir;

use templa_config::{Config, ConfigError, FreeformConfigData, RawConfig, RenderContext};
use templa_core::{Builder, BuilderError, YamlBuilder};
use templa_templates::{FileTemplate, InlineTemplate, NamedTemplate, TemplateEnvironment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StubConfigData {
    foo: String,
    bar: i64,
}

fn stub_config() -> Config<StubConfigData> {
    match json!({"foo": "FOO", "bar": 5}) {
        JsonValue::Object(raw) => Config::new(raw),
        _ => unreachable!(),
    }
}

const LIST_TEMPLATE: &str = "---\n- {{ foo }}\n- {{ bar }}";
const ZOO_TEMPLATE: &str = "---\n- {{ foo }}\n- {{ bar }}\n- {{ zoo }}";

fn yaml_builder(template: &str) -> YamlBuilder<StubConfigData> {
    YamlBuilder::yaml(&stub_config(), &InlineTemplate::new("stub.yaml", template)).unwrap()
}

/// A YAML template renders, parses into a sequence and dumps back to YAML.
#[test]
fn test_yaml_builder_round_trip() {
    let mut builder = yaml_builder(LIST_TEMPLATE);

    let initialized = builder.init_builder_target();
    let context = builder.fetch_render_context(&initialized).unwrap();
    assert_eq!(JsonValue::Object(context), json!({"foo": "FOO", "bar": 5}));

    let processed = builder.process_template(initialized).unwrap();
    assert_eq!(
        builder.fetch_processed(&processed).unwrap(),
        Some(serde_yaml::from_str::<Value>("- FOO\n- 5").unwrap())
    );

    let built = builder.build(processed).unwrap();
    assert_eq!(
        builder.fetch_built(&built).unwrap().as_deref(),
        Some("- FOO\n- 5\n")
    );
}

/// A process hook can add context keys before the template is rendered.
#[test]
fn test_process_hook_extends_context() {
    let mut builder = yaml_builder(ZOO_TEMPLATE).with_process_hook(|mut context, next| {
        context.insert("zoo".into(), json!("ZOO"));
        next.run(context)
    });

    let processed = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    let expected: Value = serde_yaml::from_str("- FOO\n- 5\n- ZOO").unwrap();
    assert_eq!(builder.fetch_processed(&processed).unwrap(), Some(expected));

    // The stored render context is unaffected by what the hook changed.
    let context = builder.fetch_render_context(&processed).unwrap();
    assert!(context.get("zoo").is_none());
}

/// A build hook can change the processed value before it is dumped.
#[test]
fn test_build_hook_updates_processed_value() {
    let temp = tempdir().unwrap();
    let output_path = temp.path().join("built.yaml");

    let mut builder = yaml_builder(ZOO_TEMPLATE)
        .with_process_hook(|mut context, next| {
            context.insert("zoo".into(), json!("ZOO"));
            next.run(context)
        })
        .with_build_hook(|mut processed, next| {
            if let Some(Value::Sequence(items)) = processed.as_mut() {
                items[2] = Value::String("ZOO_Updated".to_string());
            }
            next.run(processed)
        });

    let processed = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    let built = builder.build(processed).unwrap();

    // Hooks work on copies; the processed value keeps the parsed text.
    let expected: Value = serde_yaml::from_str("- FOO\n- 5\n- ZOO").unwrap();
    assert_eq!(builder.fetch_processed(&built).unwrap(), Some(expected));

    let text = builder.fetch_built(&built).unwrap().unwrap();
    fs::write(&output_path, &text).unwrap();
    assert_eq!(
        fs::read_to_string(&output_path).unwrap(),
        "- FOO\n- 5\n- ZOO_Updated\n"
    );
}

/// Targets only work with the builder that issued them.
#[test]
fn test_targets_are_bound_to_their_builder() {
    let mut first = yaml_builder(LIST_TEMPLATE);
    let mut second = yaml_builder(LIST_TEMPLATE);
    assert_ne!(first.id(), second.id());

    let foreign = first.init_builder_target();
    assert!(matches!(
        second.fetch_render_context(&foreign),
        Err(BuilderError::InstanceMismatch { .. })
    ));
    assert!(matches!(
        second.process_template(foreign),
        Err(BuilderError::InstanceMismatch { .. })
    ));

    let processed = first
        .process_template(first.init_builder_target())
        .unwrap();
    assert!(matches!(
        second.fetch_processed(&processed),
        Err(BuilderError::InstanceMismatch { .. })
    ));
    match second.build(processed) {
        Err(BuilderError::InstanceMismatch { expected, found }) => {
            assert_eq!(expected, second.id());
            assert_eq!(found, first.id());
        }
        other => panic!("expected instance mismatch, got {:?}", other),
    }

    let processed = first
        .process_template(first.init_builder_target())
        .unwrap();
    let built = first.build(processed).unwrap();
    assert!(matches!(
        second.fetch_processed(&built),
        Err(BuilderError::InstanceMismatch { .. })
    ));
    assert!(matches!(
        second.fetch_built(&built),
        Err(BuilderError::InstanceMismatch { .. })
    ));

    // The rejected calls left the second builder untouched.
    let processed = second
        .process_template(second.init_builder_target())
        .unwrap();
    assert_eq!(second.fetch_processed(&processed).unwrap(), first.fetch_processed(&built).unwrap());
}

/// Everything a builder hands out is a copy.
#[test]
fn test_fetched_values_are_copies() {
    let mut builder = yaml_builder(LIST_TEMPLATE);
    let processed = builder
        .process_template(builder.init_builder_target())
        .unwrap();

    let mut copy = builder.fetch_processed(&processed).unwrap();
    if let Some(Value::Sequence(items)) = copy.as_mut() {
        items.clear();
    }
    let again = builder.fetch_processed(&processed).unwrap();
    assert_eq!(
        again.and_then(|value| value.as_sequence().map(Vec::len)),
        Some(2)
    );

    let built = builder.build(processed).unwrap();
    let mut text = builder.fetch_built(&built).unwrap().unwrap();
    text.push_str("- extra\n");
    assert_eq!(builder.fetch_built(&built).unwrap().unwrap(), "- FOO\n- 5\n");
}

/// Processing again with a fresh target replaces the previous result.
#[test]
fn test_reprocessing_overwrites_previous_result() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("list.yaml");
    fs::write(&path, "- {{ foo }}").unwrap();

    let mut builder = YamlBuilder::<StubConfigData>::yaml(&stub_config(), &FileTemplate::new(&path)).unwrap();
    let first = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    assert_eq!(builder.run().unwrap().as_deref(), Some("- FOO\n"));

    fs::write(&path, "- {{ bar }}").unwrap();
    let second = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    let expected: Value = serde_yaml::from_str("- 5").unwrap();
    assert_eq!(builder.fetch_processed(&second).unwrap(), Some(expected.clone()));
    assert_eq!(builder.fetch_processed(&first).unwrap(), Some(expected));
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Counter {
    base: i64,
}

/// Mapping order from the template survives parsing and dumping.
#[test]
fn test_yaml_builder_keeps_mapping_order() {
    let config = match json!({"base": 0}) {
        JsonValue::Object(raw) => Config::<Counter>::new(raw),
        _ => unreachable!(),
    }
    .with_context_hook(|data, _next| {
        let counter = data.ok_or(ConfigError::NotLoaded)?;
        let mut context = RenderContext::new();
        context.insert("foo".into(), json!(counter.base + 1));
        context.insert("bar".into(), json!(counter.base + 2));
        context.insert("zoo".into(), json!(counter.base + 3));
        Ok(context)
    });

    let source = "\
foo:
  foo_one: {{ foo }}
  foo_two: {{ foo }}
  foo_three: {{ foo }}
bar:
  bar_one: {{ bar }}
  bar_two: {{ bar }}
  bar_three: {{ bar }}
zoo:
  zoo_one: {{ zoo }}
  zoo_two: {{ zoo }}
  zoo_three: {{ zoo }}
";
    let environment = TemplateEnvironment::from_sources([("numbers.yaml", source)]).unwrap();
    let getter = NamedTemplate::new(environment, "numbers.yaml");

    let mut builder = YamlBuilder::<Counter>::yaml(&config, &getter).unwrap();
    let built = builder.run().unwrap().unwrap();

    assert_eq!(
        built,
        "\
foo:
  foo_one: 1
  foo_two: 1
  foo_three: 1
bar:
  bar_one: 2
  bar_two: 2
  bar_three: 2
zoo:
  zoo_one: 3
  zoo_two: 3
  zoo_three: 3
"
    );
}

/// Typed processed values work with the YAML builder.
#[test]
fn test_yaml_builder_with_typed_processed_value() {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Service {
        name: String,
        replicas: u32,
    }

    let template = InlineTemplate::new("service.yaml", "name: {{ foo }}\nreplicas: {{ bar }}\n");
    let mut builder =
        YamlBuilder::<StubConfigData, Service>::yaml(&stub_config(), &template).unwrap();

    let processed = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    assert_eq!(
        builder.fetch_processed(&processed).unwrap(),
        Some(Service {
            name: "FOO".to_string(),
            replicas: 5
        })
    );

    let built = builder.build(processed).unwrap();
    assert_eq!(
        builder.fetch_built(&built).unwrap().as_deref(),
        Some("name: FOO\nreplicas: 5\n")
    );
}

/// An empty rendering processes to nothing and dumps as `null`.
#[test]
fn test_empty_rendering() {
    let mut builder = YamlBuilder::<RawConfig>::yaml(
        &Config::new(RawConfig::new()),
        &InlineTemplate::new("empty.yaml", "{# nothing #}\n"),
    )
    .unwrap();

    let processed = builder
        .process_template(builder.init_builder_target())
        .unwrap();
    assert_eq!(builder.fetch_processed(&processed).unwrap(), None);

    let built = builder.build(processed).unwrap();
    assert_eq!(builder.fetch_built(&built).unwrap().as_deref(), Some("null\n"));
}

/// Failures of each step surface as the matching error variant.
#[test]
fn test_step_failures() {
    let invalid = match json!({"foo": "FOO", "bar": "not a number"}) {
        JsonValue::Object(raw) => Config::<StubConfigData>::new(raw),
        _ => unreachable!(),
    };
    assert!(matches!(
        YamlBuilder::<StubConfigData>::yaml(&invalid, &InlineTemplate::new("t", "")),
        Err(BuilderError::Config(ConfigError::Validation { .. }))
    ));

    let environment = TemplateEnvironment::new();
    let mut missing = YamlBuilder::<StubConfigData>::yaml(
        &stub_config(),
        &NamedTemplate::new(environment, "absent.yaml"),
    )
    .unwrap();
    assert!(matches!(missing.run(), Err(BuilderError::Template(_))));

    let mut unparsable = yaml_builder("key: [{{ foo }}");
    assert!(matches!(unparsable.run(), Err(BuilderError::Parse(_))));
}

/// Builders without YAML use arbitrary parse and build steps.
#[test]
fn test_custom_builder() {
    let mut builder = Builder::new(
        &stub_config(),
        &InlineTemplate::new("words", "{{ foo }} {{ bar }} {{ foo }}"),
        |rendered: &str| Ok(Some(rendered.split_whitespace().map(str::to_string).collect::<Vec<_>>())),
        |words: Option<Vec<String>>| Ok(words.map(|words| words.join(","))),
    )
    .unwrap();

    assert_eq!(builder.run().unwrap().as_deref(), Some("FOO,5,FOO"));
}

/// Config mappings reach the template in the order the config file lists them.
#[test]
fn test_config_key_order_reaches_output() {
    let config =
        Config::<FreeformConfigData>::from_yaml_str("m:\n  zeta: 1\n  alpha: 2\n  mid: 3\n").unwrap();
    let template = InlineTemplate::new(
        "ordered.yaml",
        "{% for key, value in m %}{{ key }}: {{ value }}\n{% endfor %}",
    );

    let mut builder = YamlBuilder::<FreeformConfigData>::yaml(&config, &template).unwrap();
    assert_eq!(
        builder.run().unwrap().as_deref(),
        Some("zeta: 1\nalpha: 2\nmid: 3\n")
    );
}
