// Widget domain model - Panel object classes, addresses and event records

/// Class of an addressable object on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetClass {
    Slider,
    WinButton,
    CoolGauge,
    Form,
    Gauge,
    Thermometer,
    /// Any object id this service does not address directly
    Other(u8),
}

// Wire format object ids
const OBJ_SLIDER: u8 = 4;
const OBJ_WINBUTTON: u8 = 6;
const OBJ_COOL_GAUGE: u8 = 8;
const OBJ_FORM: u8 = 10;
const OBJ_GAUGE: u8 = 11;
const OBJ_THERMOMETER: u8 = 18;

impl WidgetClass {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            OBJ_SLIDER => WidgetClass::Slider,
            OBJ_WINBUTTON => WidgetClass::WinButton,
            OBJ_COOL_GAUGE => WidgetClass::CoolGauge,
            OBJ_FORM => WidgetClass::Form,
            OBJ_GAUGE => WidgetClass::Gauge,
            OBJ_THERMOMETER => WidgetClass::Thermometer,
            other => WidgetClass::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            WidgetClass::Slider => OBJ_SLIDER,
            WidgetClass::WinButton => OBJ_WINBUTTON,
            WidgetClass::CoolGauge => OBJ_COOL_GAUGE,
            WidgetClass::Form => OBJ_FORM,
            WidgetClass::Gauge => OBJ_GAUGE,
            WidgetClass::Thermometer => OBJ_THERMOMETER,
            WidgetClass::Other(byte) => byte,
        }
    }
}

/// Where a value (or the first slot of a per-day run) is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetAddress {
    pub class: WidgetClass,
    pub index: u8,
}

impl WidgetAddress {
    pub const fn new(class: WidgetClass, index: u8) -> Self {
        Self { class, index }
    }

    /// Address of the `offset`-th slot in a contiguous run starting here
    pub fn slot(self, offset: usize) -> Self {
        Self {
            class: self.class,
            index: self.index + offset as u8,
        }
    }
}

// Gauge runs, one slot per day-of-week, oldest first
pub const TEMP_HISTORY_BASE: WidgetAddress = WidgetAddress::new(WidgetClass::Gauge, 0);
pub const TEMP_MIN_HISTORY_BASE: WidgetAddress = WidgetAddress::new(WidgetClass::Gauge, 7);
pub const TEMP_MAX_HISTORY_BASE: WidgetAddress = WidgetAddress::new(WidgetClass::Gauge, 14);
pub const PRESSURE_HISTORY_BASE: WidgetAddress = WidgetAddress::new(WidgetClass::Gauge, 21);

pub const TEMP_LIVE_THERMOMETER: WidgetAddress = WidgetAddress::new(WidgetClass::Thermometer, 0);
pub const TEMP_MIN_THERMOMETER: WidgetAddress = WidgetAddress::new(WidgetClass::Thermometer, 1);
pub const TEMP_MAX_THERMOMETER: WidgetAddress = WidgetAddress::new(WidgetClass::Thermometer, 2);
pub const PRESSURE_LIVE_DIAL: WidgetAddress = WidgetAddress::new(WidgetClass::CoolGauge, 0);

pub const RESET_MIN_BUTTON: u8 = 2;
pub const RESET_MAX_BUTTON: u8 = 6;

/// Kind of frame received from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// User interaction (button press, slider move, ...)
    ReportEvent,
    /// Reply to an explicit object read
    ReportObject,
    Other(u8),
}

pub const CMD_WRITE_OBJ: u8 = 0x01;
pub const CMD_REPORT_OBJ: u8 = 0x05;
pub const CMD_REPORT_EVENT: u8 = 0x07;

impl CommandKind {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            CMD_REPORT_EVENT => CommandKind::ReportEvent,
            CMD_REPORT_OBJ => CommandKind::ReportObject,
            other => CommandKind::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            CommandKind::ReportEvent => CMD_REPORT_EVENT,
            CommandKind::ReportObject => CMD_REPORT_OBJ,
            CommandKind::Other(byte) => byte,
        }
    }
}

/// One decoded notification from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeEventRecord {
    pub command: CommandKind,
    pub class: WidgetClass,
    pub index: u8,
    pub payload: u16,
}

impl GaugeEventRecord {
    pub fn new(command: CommandKind, class: WidgetClass, index: u8, payload: u16) -> Self {
        Self {
            command,
            class,
            index,
            payload,
        }
    }

    /// A button press as the panel reports it
    #[cfg(test)]
    pub fn button_press(index: u8) -> Self {
        Self::new(CommandKind::ReportEvent, WidgetClass::WinButton, index, 1)
    }
}
