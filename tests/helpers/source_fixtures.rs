//! `.msg` sources shared across tests.

pub const POINT: &str = "struct P\n    float32 x\n    float32 y\n";

pub const SENSOR: &str = r#"// Sensor definitions
import geometry/point

using Meters = float64
const uint32 MAX_READINGS = 128

enum Status: uint8
    OK
    DEGRADED
    FAILED = 10

struct Reading
    [attributes]
        version: 2
    uint64 timestamp: 1
    Meters range: 2 @unit("m")
    Status status: 3
    optional array<float32, max=16> samples: 4
        description: """Raw samples,
   oldest first"""
"#;

pub const GEOMETRY_POINT: &str = "struct Point\n    float64 x\n    float64 y\n";

pub const MIXED_NUMBERING: &str = "struct Mixed\n    int32 a: 1\n    int32 b\n";

pub const INT8_OVERFLOW: &str = "enum Small: int8\n    LOW = 0\n    HIGH = 200\n";

pub const UNITS_SCHEMA: &str = r#"schema_name: units
version: "1.0"
field_attributes:
  unit:
    type: string
    constraints:
      enum: [m, s, kg]
  range:
    type: object
    properties:
      min:
        type: number
        required: true
      max:
        type: number
        required: true
struct_attributes:
  version:
    type: integer
    constraints:
      min: 1
"#;
