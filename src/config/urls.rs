//! Remote archive URLs

/// Adafruit NeoPixel library bundle (CircuitPython 5.x mpy)
pub const NEOPIXEL_ARCHIVE: &str = "https://github.com/adafruit/Adafruit_CircuitPython_NeoPixel/releases/download/6.0.0/adafruit-circuitpython-neopixel-5.x-mpy-6.0.0.zip";

/// Path of the compiled module inside [`NEOPIXEL_ARCHIVE`]
pub const NEOPIXEL_ENTRY: &str = "adafruit-circuitpython-neopixel-5.x-mpy-6.0.0/lib/neopixel.mpy";
