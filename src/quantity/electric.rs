quantity!(Volts, suffix: "V", precision: 2);
quantity!(Amperes, suffix: "A", precision: 1);
quantity!(AmpereHours, suffix: "Ah", precision: 1);
