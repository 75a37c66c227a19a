//
// catalog.rs: Register catalog for the analog test chip
//
// The BUCK and CIMA tabs list the same set of ports, each with a
// default value (unknown for every port so far) and a function class
// used for filtering. The catalog
// is fixed at build time, so it's kept as static data and queried
// through lookups.
//

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Control,
    Config,
    Data,
    Clock,
    Signal,
    Supply,
}

impl Function {
    pub const ALL: [Function; 6] = [
        Function::Control,
        Function::Config,
        Function::Data,
        Function::Clock,
        Function::Signal,
        Function::Supply,
    ];

    pub fn from_name(name: &str) -> Option<Function> {
        Function::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Control => "Control",
            Function::Config => "Config",
            Function::Data => "Data",
            Function::Clock => "Clock",
            Function::Signal => "Signal",
            Function::Supply => "Supply",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Register {
    // Port name, with a <hi:lo> suffix for multi-bit ports.
    pub name: &'static str,
    pub default_value: &'static str,
    pub function: Function,
}

impl Register {
    // Bit width from the <hi:lo> suffix, 1 if there isn't one.
    pub fn width(&self) -> usize {
        let range = match (self.name.rfind('<'), self.name.strip_suffix('>')) {
            (Some(open), Some(body)) if open < body.len() => &body[open + 1..],
            _ => return 1,
        };
        let mut bounds = range.split(':').map(|x| x.parse::<usize>());
        match (bounds.next(), bounds.next(), bounds.next()) {
            (Some(Ok(hi)), Some(Ok(lo)), None) if hi >= lo => hi - lo + 1,
            _ => 1,
        }
    }

    // Name without the bit range.
    pub fn base_name(&self) -> &'static str {
        match self.name.find('<') {
            Some(i) => &self.name[..i],
            None => self.name,
        }
    }
}

// The chip documentation gives no reset values, so every port reports
// this. Function classes are grouped by port role.
pub const NO_DEFAULT: &str = "N/A";

static REGISTERS: [Register; 8] = [
    Register {
        name: "BUCK_PORB",
        default_value: NO_DEFAULT,
        function: Function::Control,
    },
    Register {
        name: "BUCK_RSTB",
        default_value: NO_DEFAULT,
        function: Function::Control,
    },
    Register {
        name: "BUCK_ASYNC_RSTB",
        default_value: NO_DEFAULT,
        function: Function::Control,
    },
    Register {
        name: "BUCK_CAL_REFBAND_H<1:0>",
        default_value: NO_DEFAULT,
        function: Function::Config,
    },
    Register {
        name: "BUCK_CAL_REFCODE_H<9:0>",
        default_value: NO_DEFAULT,
        function: Function::Config,
    },
    Register {
        name: "VREF_EN",
        default_value: NO_DEFAULT,
        function: Function::Supply,
    },
    Register {
        name: "ADC_IN0",
        default_value: NO_DEFAULT,
        function: Function::Signal,
    },
    Register {
        name: "ADC_IN1",
        default_value: NO_DEFAULT,
        function: Function::Signal,
    },
];

pub fn registers() -> &'static [Register] {
    &REGISTERS
}

// Look up by full name ("BUCK_CAL_REFBAND_H<1:0>") or base name
// ("BUCK_CAL_REFBAND_H").
pub fn find(name: &str) -> Option<&'static Register> {
    REGISTERS
        .iter()
        .find(|r| r.name == name || r.base_name() == name)
}

pub fn by_function(function: Function) -> impl Iterator<Item = &'static Register> {
    REGISTERS.iter().filter(move |r| r.function == function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(find("BUCK_PORB").unwrap().width(), 1);
        assert_eq!(find("BUCK_CAL_REFBAND_H<1:0>").unwrap().width(), 2);
        assert_eq!(find("BUCK_CAL_REFCODE_H").unwrap().width(), 10);
    }

    #[test]
    fn filter_by_function() {
        let names = by_function(Function::Control).map(|r| r.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["BUCK_PORB", "BUCK_RSTB", "BUCK_ASYNC_RSTB"]);
        assert_eq!(by_function(Function::Clock).count(), 0);
        let total: usize = Function::ALL.iter().map(|f| by_function(*f).count()).sum();
        assert_eq!(total, registers().len());
    }

    #[test]
    fn function_names_round_trip() {
        assert_eq!(Function::from_name("signal"), Some(Function::Signal));
        assert_eq!(Function::from_name("SUPPLY"), Some(Function::Supply));
        assert_eq!(Function::from_name("analog"), None);
    }

    #[test]
    fn defaults_are_unknown() {
        assert!(registers().iter().all(|r| r.default_value == NO_DEFAULT));
        assert_eq!(find("VREF_EN").unwrap().default_value, "N/A");
    }

    #[test]
    fn unknown_register() {
        assert!(find("CIMA_EN").is_none());
    }
}
