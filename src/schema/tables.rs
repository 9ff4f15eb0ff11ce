use super::{Handler, Schema};

use Handler::{Fragment, Image, Nested, Packed, PackedText, Table, Text};

/// Root of the inflated payload document
pub static CHIPSET: Schema = Schema {
    name: Some("Chipset"),
    children: &[
        ("Method", Fragment),
        ("Chips", Nested(&CHIPS)),
        ("LogBook", Fragment),
        ("FileType", Text),
        ("Type", Text),
        ("Class", Text),
        ("DataType", Text),
        ("ExternalLinks", Text),
        ("PersistSampleSignals", Text),
    ],
    any_child: None,
};

/// Container for the individual chips of a run
pub static CHIPS: Schema = Schema {
    name: Some("Chips"),
    children: &[("Chip", Nested(&CHIP))],
    any_child: None,
};

/// One chip (lane set) of a run
pub static CHIP: Schema = Schema {
    name: Some("Chip"),
    children: &[
        ("ID", Text),
        ("AssayHeader", Fragment),
        ("AssayBody", Nested(&ASSAY_BODY)),
        ("Script", Nested(&SCRIPT)),
        ("ChipInformation", Fragment),
        ("Instrument", Fragment),
        ("ComPortSettings", Fragment),
        ("DataStatus", Fragment),
        ("RawSignals", Nested(&RAW_SIGNALS)),
        ("Files", Fragment),
        ("Diagnostics", Fragment),
        ("Packet", Packed),
        ("Imported", Text),
        ("HasData", Text),
        ("NumberOfAcquiredSamples", Text),
        ("PacketFileName", Fragment),
    ],
    any_child: None,
};

/// Assay method settings of a chip
pub static ASSAY_BODY: Schema = Schema {
    name: Some("AssayBody"),
    children: &[
        ("DAAssaySetpoints", Nested(&DA_ASSAY_SETPOINTS)),
        ("DASampleSequence", Fragment),
        ("DASampleSetpoints", Nested(&DA_SAMPLE_SETPOINTS)),
        ("DALadderSequence", Nested(&DA_LADDER_SEQUENCE)),
        ("DALadderSetpoints", Fragment),
        ("UISetpoints", Fragment),
        ("DADefaultSampleSequence", Fragment),
        ("DADefaultSampleSetpoints", Fragment),
        ("DADefaultLadderSequence", Fragment),
        ("DADefaultLadderSetpoints", Fragment),
        ("DAChipSequence", Fragment),
        ("DAChipSetpoints", Fragment),
        ("DADefaultChipSequence", Fragment),
        ("DADefaultChipSetpoints", Fragment),
        ("DefaultUISetPoints", Fragment),
    ],
    any_child: None,
};

/// Assay-level data analysis settings
pub static DA_ASSAY_SETPOINTS: Schema = Schema {
    name: Some("DAAssaySetpoints"),
    children: &[
        ("DAMAssaySetpoints", Nested(&DAM_ASSAY_SETPOINTS)),
        ("DAMAssayInfoCommon", Fragment),
        ("DAMAssayInfoMolecular", Fragment),
        ("DAMDefaultAssayInfoMolecular", Fragment),
    ],
    any_child: None,
};

/// No children have been observed under this element yet.
pub static DAM_ASSAY_SETPOINTS: Schema = Schema {
    name: Some("DAMAssaySetpoints"),
    children: &[],
    any_child: None,
};

/// Data analysis sub-methods applied to samples
pub static DA_SAMPLE_SETPOINTS: Schema = Schema {
    name: Some("DASampleSetpoints"),
    children: &[
        ("DAMIntegrator", Text),
        ("DAMPeakManipulation", Fragment),
        ("DAMAlignment", Fragment),
        ("DAMConcentration", Fragment),
        ("DAMSizing", Fragment),
        ("DAMFragment", Fragment),
        ("DAMCoMigration", Fragment),
        ("DAMCalibration", Fragment),
        ("DAMSmearAnalysis", Fragment),
        ("DAMRollingBallA", Fragment),
        ("DAMRollingBallB", Fragment),
        ("DAMSpikeRejectionA", Fragment),
        ("DAMSpikeRejectionB", Fragment),
        ("DAMBaseline", Fragment),
        ("DAMCommon", Fragment),
        ("DAMStandardCurve", Fragment),
        ("DAMSavitzkyGolay", Fragment),
        ("DAMMarkerDetection", Fragment),
        ("DAMMarkerThreshold", Fragment),
        ("DAMLowerMarkerPresent", Text),
        ("DAMBaselineSubstractionOld", Fragment),
        ("DAMBaselineSubstractionGolovin", Text),
        ("DAMLinearStretchY", Text),
        ("DAMMasterMarkerDetectionRNA", Text),
        ("DAMSystemPeakDetection", Text),
        ("DAMTimeShift", Text),
        ("DAMPrepareRowData", Text),
        ("DAMIntegrator2", Fragment),
        ("DAMFragment2", Text),
        ("DAMDynamicMarkerDetection", Fragment),
        ("DAMNoiseCalculation", Fragment),
        ("DAMDeconvolution", Fragment),
        ("DAMNoiseFlagging", Fragment),
        ("DAMDetailing", Fragment),
        ("DAMPeakPercentOfTotal", Fragment),
        ("DAMIntegrationRefinement", Fragment),
        ("DAMLDLCalculation", Fragment),
    ],
    any_child: None,
};

/// Ladder analysis sequence
pub static DA_LADDER_SEQUENCE: Schema = Schema {
    name: Some("DALadderSequence"),
    children: &[("DAMethod", Fragment)],
    any_child: None,
};

/// Instrument script attached to a chip
pub static SCRIPT: Schema = Schema {
    name: Some("Script"),
    children: &[("AllowEdit", Text), ("ScriptText", PackedText)],
    any_child: None,
};

/// Raw signal sets; their element names are per-sample and not fixed
pub static RAW_SIGNALS: Schema = Schema {
    name: Some("RawSignals"),
    children: &[],
    any_child: Some(Nested(&SIGNAL_SET)),
};

/// One named signal set under `RawSignals`
pub static SIGNAL_SET: Schema = Schema {
    name: None,
    children: &[
        ("Channel", Nested(&CHANNEL)),
        ("Current", Nested(&CURRENT)),
        ("HasData", Text),
        ("SignalData", Nested(&SIGNAL_DATA)),
        ("Voltage", Nested(&VOLTAGE)),
    ],
    any_child: None,
};

/// Detector channel of a signal set
pub static CHANNEL: Schema = Schema {
    name: Some("Channel"),
    children: &[("HasData", Text), ("SignalData", Nested(&SIGNAL_DATA))],
    any_child: None,
};

/// Electrode voltage trace of a signal set
pub static VOLTAGE: Schema = Schema {
    name: Some("Voltage"),
    children: &[("HasData", Text), ("SignalData", Nested(&SIGNAL_DATA))],
    any_child: None,
};

/// Electrode current trace of a signal set
pub static CURRENT: Schema = Schema {
    name: Some("Current"),
    children: &[("HasData", Text), ("SignalData", Nested(&SIGNAL_DATA))],
    any_child: None,
};

/// A sampled trace with its axis metadata
pub static SIGNAL_DATA: Schema = Schema {
    name: Some("SignalData"),
    children: &[
        ("AlignmentBias", Text),
        ("AlignmentScale", Text),
        ("ChannelID", Text),
        ("Index", Text),
        ("MaxValue", Text),
        ("MinValue", Text),
        ("Name", Text),
        ("NumberOfSamples", Text),
        ("RawSignal", Packed),
        ("ScriptStep", Packed),
        ("UnitX", Text),
        ("UnitY", Text),
        ("XMaxVisibleRange", Text),
        ("XMinVisibleRange", Text),
        ("XStart", Text),
        ("XStartAligned", Text),
        ("XStep", Text),
        ("XStepAligned", Text),
        ("YMaxVisibleRange", Text),
        ("YMinVisibleRange", Text),
    ],
    any_child: None,
};

/// Root of the document embedded in `preview information` comments
pub static PREVIEW: Schema = Schema {
    name: Some("Preview"),
    children: &[
        ("Title", Text),
        ("ChipInfo", Table),
        ("SamplesInfo", Table),
        ("GelImage", Image),
    ],
    any_child: None,
};

/// Every schema table, roots first
pub fn all() -> [&'static Schema; 16] {
    [
        &CHIPSET,
        &PREVIEW,
        &CHIPS,
        &CHIP,
        &ASSAY_BODY,
        &DA_ASSAY_SETPOINTS,
        &DAM_ASSAY_SETPOINTS,
        &DA_SAMPLE_SETPOINTS,
        &DA_LADDER_SEQUENCE,
        &SCRIPT,
        &RAW_SIGNALS,
        &SIGNAL_SET,
        &CHANNEL,
        &VOLTAGE,
        &CURRENT,
        &SIGNAL_DATA,
    ]
}
