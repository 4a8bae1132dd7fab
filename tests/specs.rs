extern crate stache;
use stache::{render_with_partials, Node, YamlValue};

use std::{fs, collections::HashMap};
use serde::Deserialize;
use serde_yaml::Mapping as YamlMapping;

#[test]
fn comments_test() -> Result<(), String> {
    run_spec_file("comments.yml", false)
}

#[test]
fn interpolation_test() -> Result<(), String> {
    run_spec_file("interpolation.yml", false)
}

#[test]
fn sections_test() -> Result<(), String> {
    run_spec_file("sections.yml", false)
}

#[test]
fn inverted_test() -> Result<(), String> {
    run_spec_file("inverted.yml", false)
}

#[test]
fn partials_test() -> Result<(), String> {
    run_spec_file("partials.yml", false)
}

#[test]
fn delimiters_test() -> Result<(), String> {
    run_spec_file("delimiters.yml", false)
}


fn run_spec_file(path: &str, log: bool) -> Result<(), String> {
    yaml_spec(path)?
        .tests
        .iter()
        .fold(
            Ok(()),
            |acc, test| match (acc, run_spec_test(test, log)) {
                (acc, Ok(())) => acc,
                (Ok(()), Err(name)) => Err(format!("specs ({}): {}", path, name)),
                (Err(err), Err(name)) => Err(format!("{}, {}", err, name))
            }
        )
}

#[derive(Deserialize, Debug)]
struct YamlSpecFile {
    tests: Vec<YamlTestSpec>,
}

#[derive(Deserialize, Debug)]
struct YamlTestSpec {
    name: String,
    data: YamlValue,
    template: String,
    partials: Option<YamlMapping>,
    expected: String,
}

fn yaml_spec(name: &str) -> Result<YamlSpecFile, String> {
    let path = format!("tests/specs/{}", name);
    let text = fs::read_to_string(path).map_err(
        |err| format!("io: {}", err)
    )?;
    serde_yaml::from_str::<YamlSpecFile>(&text).map_err(
        |err| format!("yaml: {}", err)
    )
}

fn partials(values: &Option<YamlMapping>) -> HashMap<String, String> {
    values.iter()
        .flat_map(|mapping| mapping.iter())
        .filter_map(|(name, text)| Some((name.as_str()?.to_owned(), text.as_str()?.to_owned())))
        .collect()
}

fn run_spec_test(test: &YamlTestSpec, log: bool) -> Result<(), String> {
    let data = Node::from(&test.data);
    let partials = partials(&test.partials);
    let result = render_with_partials(&test.template, &data, &partials);
    if result != test.expected {
        if log {
            println!("{}: fail", test.name);
            println!("expected:\n{}", test.expected);
            println!("received:\n{}\n", result);
        };
        Err(test.name.clone())
    } else {
        if log {
            println!("{}: ok", test.name);
        }
        Ok(())
    }
}
