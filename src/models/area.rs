use serde::Serialize;

/// Fixed patrol area vocabulary for the monitored site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Area {
    Perimeter, // P
    Parking,   // K
    Slope03,   // S3
    Slope05,   // S5
}

impl Area {
    pub const ALL: [Area; 4] = [Area::Perimeter, Area::Parking, Area::Slope03, Area::Slope05];

    pub fn code(&self) -> &'static str {
        match self {
            Area::Perimeter => "P",
            Area::Parking => "K",
            Area::Slope03 => "S3",
            Area::Slope05 => "S5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Area::Perimeter => "Perimeter",
            Area::Parking => "Parking",
            Area::Slope03 => "Slope 03",
            Area::Slope05 => "Slope 05",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "P" => Some(Area::Perimeter),
            "K" => Some(Area::Parking),
            "S3" => Some(Area::Slope03),
            "S5" => Some(Area::Slope05),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (code or full name, any case).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "P" | "PERIMETER" => Some(Area::Perimeter),
            "K" | "PARKING" => Some(Area::Parking),
            "S3" | "SLOPE03" => Some(Area::Slope03),
            "S5" | "SLOPE05" => Some(Area::Slope05),
            _ => None,
        }
    }
}
