// fd-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, ElectricCurrent as UomElectricCurrent,
    ElectricPotential as UomElectricPotential, ElectricalResistance as UomElectricalResistance,
    MagneticFlux as UomMagneticFlux, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Current = UomElectricCurrent;
pub type Voltage = UomElectricPotential;
pub type Resistance = UomElectricalResistance;
pub type FluxLinkage = UomMagneticFlux;
pub type Time = UomTime;

#[inline]
pub fn volt(v: f64) -> Voltage {
    use uom::si::electric_potential::volt;
    Voltage::new::<volt>(v)
}

#[inline]
pub fn amp(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn ohm(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

#[inline]
pub fn radps(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn weber(v: f64) -> FluxLinkage {
    use uom::si::magnetic_flux::weber;
    FluxLinkage::new::<weber>(v)
}

#[inline]
pub fn sec(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}
