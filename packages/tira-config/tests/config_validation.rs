use std::{
	collections::HashMap,
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use tira_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("tira_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_sample(payload: String, vars: &[(&str, &str)]) -> tira_config::Result<Config> {
	let path = write_temp_config(payload);
	let vars: HashMap<String, String> =
		vars.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect();
	let result = tira_config::load_with_env(Some(path.as_path()), |key| vars.get(key).cloned());

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn sample_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn expect_validation(result: tira_config::Result<Config>, needle: &str) {
	match result {
		Err(Error::Validation { message }) => {
			assert!(message.contains(needle), "Unexpected validation message: {message}");
		},
		Err(other) => panic!("Expected validation error, got {other:?}."),
		Ok(_) => panic!("Expected validation error containing {needle:?}."),
	}
}

#[test]
fn sample_config_loads_with_env_credentials() {
	let cfg = load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[(
		"GEMINI_API_KEYS",
		"key-a, key-b,,key-c ",
	)])
	.expect("Sample config must load.");

	assert_eq!(cfg.providers.generation.api_keys, vec!["key-a", "key-b", "key-c"]);
	assert_eq!(cfg.search.top_k, 15);
	assert_eq!(cfg.partitions.len(), 3);
	assert_eq!(cfg.partitions[0].keywords, vec!["exporter"]);
	assert_eq!(cfg.partitions[1].keywords, vec!["importer", "buyer"]);
	assert_eq!(cfg.report.refusal_phrases, vec!["no relevant records", "insufficient data"]);
}

#[test]
fn missing_generation_credentials_are_fatal() {
	expect_validation(load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[]), "GEMINI_API_KEYS");
	expect_validation(
		load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[("GEMINI_API_KEYS", " , ,")]),
		"api_keys",
	);
}

#[test]
fn single_key_variable_is_a_fallback() {
	let cfg = load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[("GEMINI_API_KEY", "solo")])
		.expect("Sample config must load.");

	assert_eq!(cfg.providers.generation.api_keys, vec!["solo"]);

	let cfg = load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[
		("GEMINI_API_KEY", "solo"),
		("GEMINI_API_KEYS", "a,b"),
	])
	.expect("Sample config must load.");

	assert_eq!(cfg.providers.generation.api_keys, vec!["a", "b"]);
}

#[test]
fn blank_key_list_falls_back_to_single_key() {
	for blank in ["", " , "] {
		let cfg = load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[
			("GEMINI_API_KEYS", blank),
			("GEMINI_API_KEY", "real-key"),
		])
		.expect("Single key must be used when the key list is blank.");

		assert_eq!(cfg.providers.generation.api_keys, vec!["real-key"]);
	}

	expect_validation(
		load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[
			("GEMINI_API_KEYS", ""),
			("GEMINI_API_KEY", "  "),
		]),
		"GEMINI_API_KEYS",
	);
}

#[test]
fn port_variable_overrides_file() {
	let cfg = load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[
		("GEMINI_API_KEYS", "a"),
		("PORT", "8088"),
	])
	.expect("Sample config must load.");

	assert_eq!(cfg.service.port, 8_088);

	expect_validation(
		load_sample(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &[
			("GEMINI_API_KEYS", "a"),
			("PORT", "not-a-port"),
		]),
		"PORT",
	);
}

#[test]
fn search_credentials_come_from_env() {
	let payload = sample_with(|root| {
		let search = root
			.get_mut("providers")
			.and_then(Value::as_table_mut)
			.and_then(|providers| providers.get_mut("search"))
			.and_then(Value::as_table_mut)
			.expect("Template config must include [providers.search].");

		search.insert("api_key".to_string(), Value::String(String::new()));
	});

	expect_validation(
		load_sample(payload.clone(), &[("GEMINI_API_KEYS", "a")]),
		"PINECONE_API_KEY",
	);

	let cfg = load_sample(payload, &[
		("GEMINI_API_KEYS", "a"),
		("PINECONE_API_KEY", "pc-env"),
		("PINECONE_INDEX", "from-env"),
		("PINECONE_INDEX_HOST", "trade-intel-abc.svc.pinecone.io"),
	])
	.expect("Config must load.");

	assert_eq!(cfg.providers.search.api_key, "pc-env");
	assert_eq!(cfg.providers.search.index, "from-env");
	assert_eq!(
		cfg.providers.search.index_host.as_deref(),
		Some("trade-intel-abc.svc.pinecone.io")
	);
}

#[test]
fn duplicate_partitions_are_rejected() {
	let payload = sample_with(|root| {
		let partitions = root
			.get_mut("partitions")
			.and_then(Value::as_array_mut)
			.expect("Template config must include [[partitions]].");
		let first = partitions[0].clone();

		partitions.push(first);
	});

	expect_validation(load_sample(payload, &[("GEMINI_API_KEYS", "a")]), "more than once");
}

#[test]
fn partitions_without_keywords_are_rejected() {
	let payload = sample_with(|root| {
		let partitions = root
			.get_mut("partitions")
			.and_then(Value::as_array_mut)
			.expect("Template config must include [[partitions]].");
		let news = partitions[2].as_table_mut().expect("Partition must be a table.");

		news.insert("keywords".to_string(), Value::Array(vec![Value::String(" ".to_string())]));
	});

	expect_validation(load_sample(payload, &[("GEMINI_API_KEYS", "a")]), "global_news");
}

#[test]
fn zero_top_k_is_rejected() {
	let payload = sample_with(|root| {
		let search = root
			.get_mut("search")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [search].");

		search.insert("top_k".to_string(), Value::Integer(0));
	});

	expect_validation(load_sample(payload, &[("GEMINI_API_KEYS", "a")]), "search.top_k");
}

#[test]
fn defaults_apply_without_a_config_file() {
	let vars: HashMap<&str, &str> = HashMap::from([
		("PINECONE_API_KEY", "pc"),
		("PINECONE_INDEX", "trade-intel"),
		("GEMINI_API_KEYS", "a,b,c"),
	]);
	let cfg = tira_config::load_with_env(None, |key| vars.get(key).map(|value| value.to_string()))
		.expect("Defaults must load.");
	let names: Vec<&str> = cfg.partitions.iter().map(|partition| partition.name.as_str()).collect();

	assert_eq!(names, vec!["exporters", "importers", "global_news"]);
	assert_eq!(cfg.providers.generation.api_keys.len(), 3);
	assert_eq!(cfg.providers.generation.model, "gemini-2.5-flash");
	assert_eq!(cfg.service.port, 5_000);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("tira_config_test_missing.toml");
	let err = tira_config::load_with_env(Some(path.as_path()), |_| None)
		.expect_err("Missing file must fail to load.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
