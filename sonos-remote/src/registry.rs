//! In-memory registry of discovered renderers.

use remote_discovery::Device;

/// Ordered set of the renderers found by the most recent discovery pass.
///
/// The registry is replaced wholesale per pass, so devices that stop
/// answering disappear on the next pass. At most one entry exists per IP;
/// order is discovery order and carries no meaning beyond display.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Replace the whole registry with the result of a discovery pass.
    pub fn replace(&mut self, devices: Vec<Device>) {
        self.devices = devices;
    }

    /// Current devices in discovery order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// First device whose name matches, ignoring ASCII case. Exact match
    /// only, no prefix or fuzzy lookup.
    pub fn by_name(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// First device at exactly this address.
    pub fn by_ip(&self, ip: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.ip == ip)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn clear(&mut self) {
        self.devices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, ip: &str) -> Device {
        Device { name: name.to_string(), ip: ip.to_string() }
    }

    fn populated() -> DeviceRegistry {
        let mut registry = DeviceRegistry::default();
        registry.replace(vec![
            device("Living Room", "192.168.1.50"),
            device("Kitchen", "192.168.1.51"),
        ]);
        registry
    }

    #[test]
    fn test_lookup_by_name_ignores_case() {
        let registry = populated();
        assert_eq!(registry.by_name("living room").map(|d| d.ip.as_str()), Some("192.168.1.50"));
        assert_eq!(registry.by_name("KITCHEN").map(|d| d.ip.as_str()), Some("192.168.1.51"));
    }

    #[test]
    fn test_lookup_by_name_is_exact_not_partial() {
        let registry = populated();
        assert!(registry.by_name("Living").is_none());
        assert!(registry.by_name("Kitchen Speaker").is_none());
    }

    #[test]
    fn test_lookup_by_ip() {
        let registry = populated();
        assert_eq!(registry.by_ip("192.168.1.51").map(|d| d.name.as_str()), Some("Kitchen"));
        assert!(registry.by_ip("192.168.1.52").is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut registry = populated();
        registry.replace(vec![device("Den", "192.168.1.60")]);

        assert_eq!(registry.len(), 1);
        assert!(registry.by_name("Living Room").is_none());
        assert_eq!(registry.devices()[0].name, "Den");
    }

    #[test]
    fn test_replace_with_empty_pass_empties_the_registry() {
        let mut registry = populated();
        registry.replace(Vec::new());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let registry = populated();
        let names: Vec<_> = registry.devices().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Living Room", "Kitchen"]);
    }
}
