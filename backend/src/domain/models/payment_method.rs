//! Domain model for the payment channel catalog.
use shared::PaymentMethod;

/// A payment channel the bursary accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentChannel {
    /// Stable key used in requests and transaction references
    pub key: &'static str,
    /// Display label, also recorded on each payment row
    pub label: &'static str,
    /// Instant channels settle at creation time; the rest confirm out of band
    pub instant: bool,
}

/// The fixed catalog of channels offered to students.
pub static PAYMENT_CHANNELS: [PaymentChannel; 4] = [
    PaymentChannel {
        key: "mobile-money",
        label: "Mobile Money",
        instant: true,
    },
    PaymentChannel {
        key: "bank-transfer",
        label: "Bank Transfer",
        instant: false,
    },
    PaymentChannel {
        key: "bank-branch",
        label: "Bank Branch",
        instant: false,
    },
    PaymentChannel {
        key: "online-portal",
        label: "Online Portal",
        instant: true,
    },
];

/// Look up a channel by key.
pub fn find_channel(key: &str) -> Option<&'static PaymentChannel> {
    PAYMENT_CHANNELS.iter().find(|channel| channel.key == key)
}

impl PaymentChannel {
    /// Convert to the wire representation
    pub fn to_dto(&self) -> PaymentMethod {
        PaymentMethod {
            key: self.key.to_string(),
            label: self.label.to_string(),
            instant: self.instant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_channel_known_keys() {
        assert_eq!(find_channel("mobile-money").unwrap().label, "Mobile Money");
        assert_eq!(find_channel("bank-branch").unwrap().label, "Bank Branch");
    }

    #[test]
    fn test_find_channel_unknown_key() {
        assert!(find_channel("carrier-pigeon").is_none());
        assert!(find_channel("").is_none());
    }

    #[test]
    fn test_settlement_speed_per_channel() {
        assert!(find_channel("mobile-money").unwrap().instant);
        assert!(find_channel("online-portal").unwrap().instant);
        assert!(!find_channel("bank-transfer").unwrap().instant);
        assert!(!find_channel("bank-branch").unwrap().instant);
    }

    #[test]
    fn test_to_dto() {
        let dto = find_channel("bank-transfer").unwrap().to_dto();
        assert_eq!(dto.key, "bank-transfer");
        assert_eq!(dto.label, "Bank Transfer");
        assert!(!dto.instant);
    }
}
