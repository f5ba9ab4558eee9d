use crate::FleetscopeError;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";
pub const RESOURCE_EPHEMERAL_STORAGE: &str = "ephemeral-storage";

/// Resource quantities requested by one replica
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuantities {
    /// CPU in millicores (1000 = 1 core)
    pub cpu_millicores: i64,
    /// Memory in bytes
    pub memory_bytes: i64,
    /// Ephemeral storage in bytes
    pub ephemeral_storage_bytes: i64,
    /// Extended resources (e.g. "nvidia.com/gpu") in milli-units
    pub scalar_milli: BTreeMap<String, i64>,
}

impl ResourceQuantities {
    /// Parse a Kubernetes quantity into milli-units, rounding up.
    ///
    /// Accepts decimal suffixes (m, k, M, G, T, P, E), binary suffixes
    /// (Ki .. Ei) and exponents ("1e3"). Integer amounts are computed exactly;
    /// fractional amounts go through f64.
    pub fn parse_milli(s: &str) -> Result<i64, String> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let out_of_range = || format!("Quantity out of range: {}", s);

        // Milli-units per unit of the suffix, exact when it is a whole number
        let (exact_scale, float_scale): (Option<i128>, f64) = match suffix {
            "m" => (Some(1), 1.0),
            "" => (Some(1_000), 1e3),
            "k" => (Some(1_000_000), 1e6),
            "M" => (Some(10i128.pow(9)), 1e9),
            "G" => (Some(10i128.pow(12)), 1e12),
            "T" => (Some(10i128.pow(15)), 1e15),
            "P" => (Some(10i128.pow(18)), 1e18),
            "E" => (Some(10i128.pow(21)), 1e21),
            "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei" => {
                let power = match suffix {
                    "Ki" => 1,
                    "Mi" => 2,
                    "Gi" => 3,
                    "Ti" => 4,
                    "Pi" => 5,
                    _ => 6,
                };
                (
                    Some(1_000 * 1024i128.pow(power)),
                    1e3 * 1024f64.powi(power as i32),
                )
            }
            exp if exp.starts_with(['e', 'E']) => {
                let power: i32 = exp[1..]
                    .parse()
                    .map_err(|_| format!("Invalid quantity exponent: {}", s))?;
                let power = power.checked_add(3).ok_or_else(out_of_range)?;
                let exact = u32::try_from(power)
                    .ok()
                    .and_then(|p| 10i128.checked_pow(p));
                (exact, 10f64.powi(power))
            }
            _ => return Err(format!("Invalid quantity suffix: {}", s)),
        };

        if !number.contains('.') {
            if let Some(scale) = exact_scale {
                let value: i128 = number
                    .parse()
                    .map_err(|_| format!("Invalid quantity format: {}", s))?;
                let milli = value.checked_mul(scale).ok_or_else(out_of_range)?;
                return i64::try_from(milli).map_err(|_| out_of_range());
            }
        }

        let value: f64 = number
            .parse()
            .map_err(|_| format!("Invalid quantity format: {}", s))?;

        let exact = value * float_scale;
        // Absorb float noise before rounding up
        let milli = if (exact - exact.round()).abs() < 1e-6 {
            exact.round()
        } else {
            exact.ceil()
        };
        if !milli.is_finite() || milli.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        Ok(milli as i64)
    }

    /// Parse CPU string (e.g., "2", "1000m", "0.5") into millicores
    pub fn parse_cpu(s: &str) -> Result<i64, String> {
        Self::parse_milli(s)
    }

    /// Parse memory string (e.g., "128Mi", "1G", "1024") into bytes
    pub fn parse_memory(s: &str) -> Result<i64, String> {
        let milli = Self::parse_milli(s)?;
        // Round partial bytes up
        Ok(milli / 1000 + i64::from(milli % 1000 > 0))
    }

    /// Build quantities from a k8s-openapi resource map.
    ///
    /// Fails on the first entry that is not a valid quantity.
    pub fn from_k8s_resource_map(
        resources: &BTreeMap<String, Quantity>,
    ) -> Result<Self, FleetscopeError> {
        let mut quantities = Self::default();

        for (name, quantity) in resources {
            let fail =
                |reason: String| FleetscopeError::aggregation_failed(name, &quantity.0, reason);
            match name.as_str() {
                RESOURCE_CPU => {
                    quantities.cpu_millicores = Self::parse_cpu(&quantity.0).map_err(fail)?
                }
                RESOURCE_MEMORY => {
                    quantities.memory_bytes = Self::parse_memory(&quantity.0).map_err(fail)?
                }
                RESOURCE_EPHEMERAL_STORAGE => {
                    quantities.ephemeral_storage_bytes =
                        Self::parse_memory(&quantity.0).map_err(fail)?
                }
                _ => {
                    let milli = Self::parse_milli(&quantity.0).map_err(fail)?;
                    quantities.scalar_milli.insert(name.clone(), milli);
                }
            }
        }

        Ok(quantities)
    }

    /// Add another set of quantities to this one.
    ///
    /// Fails without modifying `self` if any total would overflow.
    pub fn add(&mut self, other: &Self) -> Result<(), FleetscopeError> {
        let sum = |resource: &str, a: i64, b: i64| {
            a.checked_add(b).ok_or_else(|| {
                FleetscopeError::aggregation_failed(
                    resource,
                    format!("{} + {}", a, b),
                    "Quantity out of range",
                )
            })
        };

        let cpu_millicores = sum(RESOURCE_CPU, self.cpu_millicores, other.cpu_millicores)?;
        let memory_bytes = sum(RESOURCE_MEMORY, self.memory_bytes, other.memory_bytes)?;
        let ephemeral_storage_bytes = sum(
            RESOURCE_EPHEMERAL_STORAGE,
            self.ephemeral_storage_bytes,
            other.ephemeral_storage_bytes,
        )?;
        let mut scalar_milli = self.scalar_milli.clone();
        for (name, milli) in &other.scalar_milli {
            let current = scalar_milli.entry(name.clone()).or_insert(0);
            *current = sum(name.as_str(), *current, *milli)?;
        }

        self.cpu_millicores = cpu_millicores;
        self.memory_bytes = memory_bytes;
        self.ephemeral_storage_bytes = ephemeral_storage_bytes;
        self.scalar_milli = scalar_milli;
        Ok(())
    }

    /// Raise each resource to at least the amount in `other`
    pub fn set_max(&mut self, other: &Self) {
        self.cpu_millicores = self.cpu_millicores.max(other.cpu_millicores);
        self.memory_bytes = self.memory_bytes.max(other.memory_bytes);
        self.ephemeral_storage_bytes = self
            .ephemeral_storage_bytes
            .max(other.ephemeral_storage_bytes);
        for (name, milli) in &other.scalar_milli {
            let current = self.scalar_milli.entry(name.clone()).or_insert(0);
            *current = (*current).max(*milli);
        }
    }

    /// Convert to a k8s-openapi resource map, omitting zero-valued resources
    pub fn to_k8s_resource_map(&self) -> BTreeMap<String, Quantity> {
        let mut resources = BTreeMap::new();

        if self.cpu_millicores > 0 {
            resources.insert(
                RESOURCE_CPU.to_string(),
                Quantity(Self::format_milli(self.cpu_millicores)),
            );
        }
        if self.memory_bytes > 0 {
            resources.insert(
                RESOURCE_MEMORY.to_string(),
                Quantity(Self::format_bytes(self.memory_bytes)),
            );
        }
        if self.ephemeral_storage_bytes > 0 {
            resources.insert(
                RESOURCE_EPHEMERAL_STORAGE.to_string(),
                Quantity(Self::format_bytes(self.ephemeral_storage_bytes)),
            );
        }
        for (name, milli) in &self.scalar_milli {
            if *milli > 0 {
                resources.insert(name.clone(), Quantity(Self::format_milli(*milli)));
            }
        }

        resources
    }

    /// Format milli-units: 500 -> "500m", 2000 -> "2"
    pub fn format_milli(milli: i64) -> String {
        if milli % 1000 == 0 {
            format!("{}", milli / 1000)
        } else {
            format!("{}m", milli)
        }
    }

    /// Format bytes with the largest clean binary suffix: Gi, Mi, Ki, or raw bytes
    pub fn format_bytes(bytes: i64) -> String {
        const GIB: i64 = 1024 * 1024 * 1024;
        const MIB: i64 = 1024 * 1024;
        const KIB: i64 = 1024;

        if bytes > 0 && bytes % GIB == 0 {
            format!("{}Gi", bytes / GIB)
        } else if bytes > 0 && bytes % MIB == 0 {
            format!("{}Mi", bytes / MIB)
        } else if bytes > 0 && bytes % KIB == 0 {
            format!("{}Ki", bytes / KIB)
        } else {
            format!("{}", bytes)
        }
    }
}
