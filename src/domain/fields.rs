use super::errors::DomainError;

/// Materials a shipment can carry. Stored as the lowercase wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Roda,
    Baluwa,
    Dhunga,
    Gravel,
    Chips,
    Dust,
    Mato,
    BaseSubbase,
    Itta,
    Kawadi,
    KaathDaura,
    Other,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Roda => "roda",
            Material::Baluwa => "baluwa",
            Material::Dhunga => "dhunga",
            Material::Gravel => "gravel",
            Material::Chips => "chips",
            Material::Dust => "dust",
            Material::Mato => "mato",
            Material::BaseSubbase => "base/subbase",
            Material::Itta => "itta",
            Material::Kawadi => "kawadi",
            Material::KaathDaura => "kaath/daura",
            Material::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "roda" => Ok(Material::Roda),
            "baluwa" => Ok(Material::Baluwa),
            "dhunga" => Ok(Material::Dhunga),
            "gravel" => Ok(Material::Gravel),
            "chips" => Ok(Material::Chips),
            "dust" => Ok(Material::Dust),
            "mato" => Ok(Material::Mato),
            "base/subbase" => Ok(Material::BaseSubbase),
            "itta" => Ok(Material::Itta),
            "kawadi" => Ok(Material::Kawadi),
            "kaath/daura" => Ok(Material::KaathDaura),
            "other" => Ok(Material::Other),
            other => Err(DomainError::Validation(format!(
                "'{}' is not a valid material",
                other
            ))),
        }
    }
}

/// Truck bed sizes the billing desk recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleSize {
    Cf420,
    Cf260,
    Cf160,
    Cf100,
    Other,
}

impl VehicleSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleSize::Cf420 => "420 cubic feet",
            VehicleSize::Cf260 => "260 cubic feet",
            VehicleSize::Cf160 => "160 cubic feet",
            VehicleSize::Cf100 => "100 cubic feet",
            VehicleSize::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "420 cubic feet" => Ok(VehicleSize::Cf420),
            "260 cubic feet" => Ok(VehicleSize::Cf260),
            "160 cubic feet" => Ok(VehicleSize::Cf160),
            "100 cubic feet" => Ok(VehicleSize::Cf100),
            "other" => Ok(VehicleSize::Other),
            other => Err(DomainError::Validation(format!(
                "'{}' is not a valid vehicle size",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Local,
    Crossborder,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Local => "local",
            Region::Crossborder => "crossborder",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "local" => Ok(Region::Local),
            "crossborder" => Ok(Region::Crossborder),
            other => Err(DomainError::Validation(format!(
                "'{}' is not a valid region",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_roundtrips_including_slashed_values() {
        for m in [
            Material::Roda,
            Material::BaseSubbase,
            Material::KaathDaura,
            Material::Other,
        ] {
            assert_eq!(Material::parse(m.as_str()).unwrap(), m);
        }
    }

    #[test]
    fn unknown_material_is_validation_error() {
        assert!(matches!(
            Material::parse("sand"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn vehicle_size_roundtrips() {
        for v in [
            VehicleSize::Cf420,
            VehicleSize::Cf260,
            VehicleSize::Cf160,
            VehicleSize::Cf100,
            VehicleSize::Other,
        ] {
            assert_eq!(VehicleSize::parse(v.as_str()).unwrap(), v);
        }
    }

    #[test]
    fn region_rejects_unknown_value() {
        assert!(Region::parse("international").is_err());
        assert_eq!(Region::parse("crossborder").unwrap(), Region::Crossborder);
    }
}
