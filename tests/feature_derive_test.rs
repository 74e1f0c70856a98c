#[cfg(feature = "derive")]
#[cfg(test)]
mod tests {
    use consistent_hashring::{HashRing, Ownership, RingConfig};

    #[test]
    fn test_serialize_and_deserialize_ownership() {
        let original = Ownership {
            hash_range: 0..=10,
            node: "node1".to_string(),
        };

        // Serialize the `Ownership` instance to JSON
        let serialized = serde_json::to_string(&original).expect("Serialization failed");

        // Deserialize the JSON string back into an `Ownership` instance
        let deserialized: Ownership =
            serde_json::from_str(&serialized).expect("Deserialization failed");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_ring_from_deserialized_config() {
        let config: RingConfig =
            serde_json::from_str(r#"{ "replicas": 16 }"#).expect("Deserialization failed");

        let ring = HashRing::from_config(&config).expect("valid config");
        ring.add_node("node1");

        assert_eq!(ring.vlen(), 16);
    }

    #[test]
    fn test_zero_replicas_from_config_are_rejected() {
        let config: RingConfig =
            serde_json::from_str(r#"{ "replicas": 0 }"#).expect("Deserialization failed");

        assert!(HashRing::from_config(&config).is_err());
    }
}
