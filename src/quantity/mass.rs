quantity!(Kilograms, suffix: "kg", precision: 2);
