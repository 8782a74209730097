use std::{collections::HashMap, path::Path};

use anyhow::{ensure, Context, Result};
use hocon::{Hocon, HoconLoader};

#[derive(Debug)]
pub struct ConfigLoader {
    hocon: Hocon,
    env: HashMap<String, String>,
    scope: String,
}

impl ConfigLoader {
    pub fn new(path: impl AsRef<Path>, scope: String) -> Result<Self> {
        let path = path.as_ref();
        ensure!(path.is_file(), "The config file {:?} was not found", path);

        let env = std::env::vars().collect::<HashMap<_, _>>();

        let hocon = HoconLoader::new()
            .load_file(path)
            .with_context(|| format!("Failed to find or load config file at: {:?}", path))?
            .hocon()?;

        Ok(Self { hocon, env, scope })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.env.get(name) {
            return Some(Value::String(value.clone()));
        }

        let scope = &self.hocon[self.scope.as_str()];
        if matches!(scope, Hocon::Hash(_)) {
            if let Some(value) = Self::map_hocon(scope, name) {
                return Some(value);
            }
        }

        Self::map_hocon(&self.hocon, name)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn load<T: Config>(&self) -> Result<T> {
        let res = T::load(self)?;
        Ok(res)
    }

    fn map_hocon(hocon: &Hocon, name: &str) -> Option<Value> {
        match &hocon[name] {
            Hocon::Real(f64) => Some(Value::Float(*f64 as f32)),
            Hocon::Integer(i64) => Some(Value::Integer(*i64 as usize)),
            Hocon::String(string) => Some(Value::String(string.clone())),
            Hocon::Boolean(bool) => Some(Value::Boolean(*bool)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Value {
    String(String),
    Integer(usize),
    Float(f32),
    Boolean(bool),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(val) => Some(*val),
            Value::String(val) => Hocon::String(val.clone()).as_bool(),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(val) => Some(*val),
            Value::String(val) => val.parse::<usize>().ok(),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Integer(val) => Some(*val as f32),
            Value::String(val) => val.parse::<f32>().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            Value::Boolean(true) => Some("true".to_string()),
            Value::Boolean(false) => Some("false".to_string()),
            Value::Float(val) => Some(val.to_string()),
            Value::Integer(val) => Some(val.to_string()),
        }
    }
}

pub trait Config {
    fn load(config: &ConfigLoader) -> Result<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct TestOptions {
        simulations: usize,
        exploration_weight: f32,
        name: String,
    }

    impl Config for TestOptions {
        fn load(config: &ConfigLoader) -> Result<Self> {
            Ok(Self {
                simulations: config
                    .get("simulations")
                    .and_then(|v| v.as_usize())
                    .unwrap_or(10),
                exploration_weight: config
                    .get("exploration_weight")
                    .and_then(|v| v.as_f32())
                    .unwrap_or(1.0),
                name: config
                    .get("name")
                    .and_then(|v| v.as_string())
                    .unwrap_or_default(),
            })
        }
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_scoped_values_take_precedence() {
        let file = write_config("simulations = 5\nplay { simulations = 50, name = \"scoped\" }\n");

        let config = ConfigLoader::new(file.path(), "play".to_string()).unwrap();
        let options: TestOptions = config.load().unwrap();

        assert_eq!(options.simulations, 50);
        assert_eq!(options.name, "scoped");
        assert_eq!(options.exploration_weight, 1.0);
    }

    #[test]
    fn test_falls_back_to_root_values() {
        let file = write_config("exploration_weight = 1.5\nother { simulations = 50 }\n");

        let config = ConfigLoader::new(file.path(), "play".to_string()).unwrap();
        let options: TestOptions = config.load().unwrap();

        assert_eq!(options.simulations, 10);
        assert_eq!(options.exploration_weight, 1.5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.conf");
        assert!(ConfigLoader::new(path, "play".to_string()).is_err());
    }
}
