//! Estimator input layout

// Imports
use {
	super::{Binding, BindingKind, Scope, Template, TemplateEntry},
	crate::hierarchy::CacheHierarchy,
};

/// Template builder
struct Builder {
	entries: Vec<TemplateEntry>,
}

impl Builder {
	/// Adds a literal line
	fn literal(&mut self, text: impl Into<String>) {
		self.entries.push(TemplateEntry {
			text:    text.into(),
			binding: None,
		});
	}

	/// Adds a line bound to `name`
	fn bound(&mut self, text: &str, kind: BindingKind, name: &str, scope: Scope) {
		self.entries.push(TemplateEntry {
			text:    text.to_owned(),
			binding: Some(Binding {
				kind,
				name: name.to_owned(),
				scope,
			}),
		});
	}

	fn cfg(&mut self, text: &str, name: &str, scope: Scope) {
		self.bound(text, BindingKind::Cfg, name, scope);
	}

	fn stat(&mut self, text: &str, name: &str, scope: Scope) {
		self.bound(text, BindingKind::Stat, name, scope);
	}

	fn comb(&mut self, text: &str, name: &str, scope: Scope) {
		self.bound(text, BindingKind::Comb, name, scope);
	}
}

/// Builds the estimator input template for `hierarchy`
pub fn build(hierarchy: &CacheHierarchy) -> Template {
	let ncores = hierarchy.ncores;
	let num_l2s = hierarchy.num_l2s;
	let num_l3s = hierarchy.num_l3s;
	let technology_node = hierarchy.technology_node;
	let private_l2s = u8::from(hierarchy.private_l2s);

	let mut builder = Builder { entries: vec![] };

	// System
	builder.literal("<?xml version=\"1.0\" ?>");
	builder.literal("<!-- McPAT interface-->");
	builder.literal("<component id=\"root\" name=\"root\">");
	builder.literal("\t<component id=\"system\" name=\"system\">");
	builder.literal("\t\t<!--McPAT will skip the components if number is set to 0 -->");
	builder.literal(format!("\t\t<param name=\"number_of_cores\" value=\"{ncores}\"/>"));
	builder.literal("\t\t<param name=\"number_of_L1Directories\" value=\"0\"/>");
	builder.literal("\t\t<param name=\"number_of_L2Directories\" value=\"0\"/>");
	builder.literal(format!("\t\t<param name=\"number_of_L2s\" value=\"{num_l2s}\"/> <!-- This number means how many L2 clusters in each cluster there can be multiple banks/ports -->"));
	builder.literal(format!("\t\t<param name=\"Private_L2\" value =\"{private_l2s}\"/>"));
	builder.literal(format!("\t\t<param name=\"number_of_L3s\" value=\"{num_l3s}\"/> <!-- This number means how many L3 clusters -->"));
	builder.literal("\t\t<param name=\"number_of_NoCs\" value=\"1\"/>");
	builder.literal("\t\t<param name=\"homogeneous_cores\" value=\"0\"/><!--1 means homo -->");
	builder.literal("\t\t<param name=\"homogeneous_L2s\" value=\"0\"/>");
	builder.literal("\t\t<param name=\"homogeneous_L1Directories\" value=\"0\"/>");
	builder.literal("\t\t<param name=\"homogeneous_L2Directories\" value=\"0\"/>");
	builder.literal("\t\t<param name=\"homogeneous_L3s\" value=\"0\"/>");
	builder.literal("\t\t<param name=\"homogeneous_ccs\" value=\"1\"/><!--cache coherece hardware -->");
	builder.literal("\t\t<param name=\"homogeneous_NoCs\" value=\"1\"/>");
	builder.literal(format!("\t\t<param name=\"core_tech_node\" value=\"{technology_node}\"/><!-- nm -->"));
	builder.cfg("\t\t<param name=\"target_core_clockrate\" value='%i'/><!--MHz -->", "core_clock", Scope::SystemWide);
	builder.literal("\t\t<param name=\"temperature\" value=\"330\"/> <!-- Kelvin -->");
	builder.literal("\t\t<param name=\"number_cache_levels\" value=\"3\"/>");
	builder.literal("\t\t<param name=\"interconnect_projection_type\" value=\"0\"/><!--0: agressive wire technology; 1: conservative wire technology -->");
	builder.literal("\t\t<param name=\"device_type\" value=\"0\"/><!--0: HP(High Performance Type); 1: LSTP(Low standby power) 2: LOP (Low Operating Power)  -->");
	builder.literal("\t\t<param name=\"longer_channel_device\" value=\"1\"/><!-- 0 no use; 1 use when approperiate -->");
	builder.literal("\t\t<param name=\"power_gating\" value=\"1\"/><!-- 0 not enabled; 1 enabled -->");
	builder.literal("\t\t<param name=\"machine_bits\" value=\"64\"/>");
	builder.literal("\t\t<param name=\"virtual_address_width\" value=\"64\"/>");
	builder.literal("\t\t<param name=\"physical_address_width\" value=\"52\"/>");
	builder.literal("\t\t<param name=\"virtual_memory_page_size\" value=\"4096\"/>");
	builder.stat("\t\t<stat name=\"total_cycles\" value=\"%i\"/>", "total_system_cycles", Scope::SystemWide);
	builder.stat("\t\t<stat name=\"idle_cycles\" value=\"%i\"/>", "total_system_idle_cycles", Scope::SystemWide);
	builder.stat("\t\t<stat name=\"busy_cycles\"  value=\"%i\"/>", "total_system_busy_cycles", Scope::SystemWide);
	builder.literal("\t\t\t<!--This page size(B) is complete different from the page size in Main memo secction. this page size is the size of ");
	builder.literal("\t\t\tvirtual memory from OS/Archi perspective; the page size in Main memo secction is the actuall physical line in a DRAM bank  -->");
	builder.literal("\t\t<!-- *********************** cores ******************* -->");
	// Cores
	for core in 0..ncores {
		builder.literal(format!("\t\t<component id=\"system.core{core}\" name=\"core{core}\">"));
		builder.literal("\t\t<!-- Core property -->");
		builder.cfg("\t\t\t<param name=\"clock_rate\" value='%i'/>", "core_clock", Scope::PerCore(core));
		builder.cfg("\t\t\t<param name=\"vdd\" value=\"%f\"/><!-- 0 means using ITRS default vdd -->", "core_vdd", Scope::PerCore(core));
		builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
		builder.literal("\t\t\t<param name=\"opt_local\" value=\"1\"/>");
		builder.literal("\t\t\t<param name=\"instruction_length\" value=\"32\"/>");
		builder.literal("\t\t\t<param name=\"opcode_width\" value=\"16\"/>");
		builder.literal("\t\t\t<!-- address width determins the tag_width in Cache, LSQ and buffers in cache controller ");
		builder.literal("\t\t\tdefault value is machine_bits, if not set --> ");
		builder.cfg("\t\t\t<param name=\"machine_type\" value=\"%i\"/><!-- 1 inorder; 0 OOO-->", "machineType", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- inorder/OoO -->");
		builder.literal("\t\t\t<param name=\"number_hardware_threads\" value=\"1\"/>");
		builder.literal("\t\t\t<!-- number_instruction_fetch_ports(icache ports) is always 1 in single-thread processor,");
		builder.literal("\t\t\tit only may be more than one in SMT processors. BTB ports always equals to fetch ports since ");
		builder.literal("\t\t\tbranch information in consective branch instructions in the same fetch group can be read out from BTB once.--> ");
		builder.cfg("\t\t\t<param name=\"fetch_width\" value=\"%d\"/>", "issue_width", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- fetch_width determins the size of cachelines of L1 cache block -->");
		builder.literal("\t\t\t<param name=\"number_instruction_fetch_ports\" value=\"1\"/>");
		builder.cfg("\t\t\t<param name=\"decode_width\" value=\"%d\"/>", "issue_width", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- decode_width determins the number of ports of the ");
		builder.literal("\t\t\trenaming table (both RAM and CAM) scheme -->");
		builder.literal("\t\t\t<param name=\"x86\" value=\"1\"/> ");
		builder.literal("\t\t\t<param name=\"micro_opcode_width\" value=\"8\"/> ");
		builder.cfg("\t\t\t<param name=\"issue_width\" value=\"%u\"/>", "issue_width", Scope::PerCore(core));
		builder.cfg("\t\t\t<param name=\"peak_issue_width\" value=\"%u\"/>", "peak_issue_width", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- issue_width determins the number of ports of Issue window and other logic ");
		builder.literal("\t\t\t\tas in the complexity effective proccessors paper; issue_width==dispatch_width -->");
		builder.cfg("\t\t\t<param name=\"commit_width\" value=\"%u\"/>", "issue_width", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- commit_width determins the number of ports of register files -->");
		builder.literal("\t\t\t<param name=\"fp_issue_width\" value=\"2\"/>");
		builder.literal("\t\t\t<param name=\"prediction_width\" value=\"1\"/>");
		builder.literal("\t\t\t<!-- number of branch instructions can be predicted simultannouesl-->");
		builder.literal("\t\t\t<!-- Current version of McPAT does not distinguish int and floating point pipelines");
		builder.literal("\t\t\tTheses parameters are reserved for future use.-->");
		builder.literal("\t\t\t<param name=\"pipelines_per_core\" value=\"1,1\"/>");
		builder.literal("\t\t\t<!--integer_pipeline and floating_pipelines, if the floating_pipelines is 0, then the pipeline is shared-->");
		builder.literal("\t\t\t<param name=\"pipeline_depth\" value=\"14,14\"/>");
		builder.literal("\t\t\t<!-- pipeline depth of int and fp, if pipeline is shared, the second number is the average cycles of fp ops -->");
		builder.literal("\t\t\t<!-- issue and exe unit-->");
		builder.cfg("\t\t\t<param name=\"ALU_per_core\" value=\"%u\"/>", "ALU_per_core", Scope::PerCore(core));
		builder.literal("\t\t\t<param name=\"MUL_per_core\" value=\"1\"/>");
		builder.literal("\t\t\t<!-- In superscalar processors, usually all ALU are not the same. certain inst. can only");
		builder.literal("\t\t\tbe processed by certain ALU. However, current McPAT does not consider this subtle difference -->");
		builder.literal("\t\t\t<param name=\"FPU_per_core\" value=\"2\"/>");
		builder.literal("\t\t\t<!-- buffer between IF and ID stage -->");
		builder.literal("\t\t\t<param name=\"instruction_buffer_size\" value=\"32\"/>");
		builder.literal("\t\t\t<!-- buffer between ID and sche/exe stage -->");
		builder.literal("\t\t\t<param name=\"decoded_stream_buffer_size\" value=\"16\"/>");
		builder.literal("\t\t\t<param name=\"instruction_window_scheme\" value=\"1\"/><!-- 0 PHYREG based, 1 RSBASED-->");
		builder.literal("\t\t\t<!-- McPAT support 2 types of OoO cores, RS based and physical reg based-->");
		builder.literal("\t\t\t<param name=\"instruction_window_size\" value=\"36\"/>");
		builder.literal("\t\t\t<param name=\"fp_instruction_window_size\" value=\"0\"/>");
		builder.literal("\t\t\t<!-- the instruction issue Q as in Alpha 21264; The RS as in Intel P6 -->");
		builder.cfg("\t\t\t<param name=\"ROB_size\" value=\"%d\"/>", "window_size", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- each in-flight instruction has an entry in ROB -->");
		builder.literal("\t\t\t<!-- registers -->");
		builder.literal("\t\t\t<param name=\"archi_Regs_IRF_size\" value=\"16\"/>");
		builder.literal("\t\t\t<param name=\"archi_Regs_FRF_size\" value=\"32\"/>");
		builder.literal("\t\t\t<!--  if OoO processor, phy_reg number is needed for renaming logic, ");
		builder.literal("\t\t\trenaming logic is for both integer and floating point insts.  -->");
		builder.literal("\t\t\t<param name=\"phy_Regs_IRF_size\" value=\"256\"/>");
		builder.literal("\t\t\t<param name=\"phy_Regs_FRF_size\" value=\"256\"/>");
		builder.literal("\t\t\t<!-- rename logic -->");
		builder.literal("\t\t\t<param name=\"rename_scheme\" value=\"0\"/>");
		builder.literal("\t\t\t<!-- can be RAM based(0) or CAM based(1) rename scheme");
		builder.literal("\t\t\tRAM-based scheme will have free list, status table;");
		builder.literal("\t\t\tRAM-based scheme have the valid bit in the data field of the CAM ");
		builder.literal("\t\t\tboth RAM and CAM need RAM-based checkpoint table, checkpoint_depth=# of in_flight instructions;");
		builder.literal("\t\t\tDetailed RAT Implementation see TR -->");
		builder.literal("\t\t\t<param name=\"register_windows_size\" value=\"0\"/>");
		builder.literal("\t\t\t<!-- how many windows in the windowed register file, sun processors;");
		builder.literal("\t\t\tno register windowing is used when this number is 0 -->");
		builder.literal("\t\t\t<!-- In OoO cores, loads and stores can be issued whether inorder(Pentium Pro) or (OoO)out-of-order(Alpha),");
		builder.literal("\t\t\tThey will always try to exeute out-of-order though. -->");
		builder.literal("\t\t\t<param name=\"LSU_order\" value=\"inorder\"/>");
		builder.literal("\t\t\t<param name=\"store_buffer_size\" value=\"96\"/>");
		builder.literal("\t\t\t<!-- By default, in-order cores do not have load buffers -->");
		builder.literal("\t\t\t<param name=\"load_buffer_size\" value=\"48\"/>");
		builder.literal("\t\t\t<!-- number of ports refer to sustainable concurrent memory accesses -->");
		builder.literal("\t\t\t<param name=\"memory_ports\" value=\"1\"/>");
		builder.literal("\t\t\t<!-- max_allowed_in_flight_memo_instructions determins the # of ports of load and store buffer");
		builder.literal("\t\t\tas well as the ports of Dcache which is connected to LSU -->");
		builder.literal("\t\t\t<!-- dual-pumped Dcache can be used to save the extra read/write ports -->");
		builder.literal("\t\t\t<param name=\"RAS_size\" value=\"64\"/>");
		builder.literal("\t\t\t<!-- general stats, defines simulation periods;require total, idle, and busy cycles for senity check  -->");
		builder.literal("\t\t\t<!-- please note: if target architecture is X86, then all the instrucions refer to (fused) micro-ops -->");
		builder.stat("\t\t\t<stat name=\"total_instructions\" value=\"%i\"/>", "total_instructions", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"int_instructions\" value=\"%i\"/>", "integer_ins", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_instructions\" value=\"%i\"/>", "fp_ins", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"branch_instructions\" value=\"%i\"/>", "branch_ins", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"branch_mispredictions\" value=\"%i\"/>", "branch_mis", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"load_instructions\" value=\"%i\"/>", "loads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"store_instructions\" value=\"%i\"/>", "stores", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"committed_instructions\" value=\"%i\"/>", "total_instructions", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"committed_int_instructions\" value=\"%i\"/>", "integer_ins", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"committed_fp_instructions\" value=\"%i\"/>", "fp_ins", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"total_cycles\" value=\"%i\"/>", "total_cycles", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"idle_cycles\" value=\"%i\"/>", "idle_cycles", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"busy_cycles\"  value=\"%i\"/>", "busy_cycles", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- instruction buffer stats -->");
		builder.literal("\t\t\t<!-- ROB stats, both RS and Phy based OoOs have ROB");
		builder.literal("\t\t\tperformance simulator should capture the difference on accesses,");
		builder.literal("\t\t\totherwise, McPAT has to guess based on number of commited instructions. -->");
		builder.stat("\t\t\t<stat name=\"ROB_reads\" value=\"%i\"/>", "ROB_reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"ROB_writes\" value=\"%i\"/>", "ROB_writes", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- RAT accesses -->");
		builder.stat("\t\t\t<stat name=\"rename_reads\" value=\"%i\"/>", "RAT_rename.reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"rename_writes\" value=\"%i\"/>", "RAT_rename.writes", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_rename_reads\" value=\"%i\"/>", "RAT_fp_rename.reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_rename_writes\" value=\"%i\"/>", "RAT_fp_rename.writes", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- decode and rename stage use this, should be total ic - nop -->");
		builder.literal("\t\t\t<!-- Inst window stats -->");
		builder.stat("\t\t\t<stat name=\"inst_window_reads\" value=\"%i\"/>", "instr.reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"inst_window_writes\" value=\"%i\"/>", "instr.writes", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"inst_window_wakeup_accesses\" value=\"%i\"/>", "instr.wakeup", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_inst_window_reads\" value=\"%i\"/>", "instr.fp.reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_inst_window_writes\" value=\"%i\"/>", "instr.fp.writes", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fp_inst_window_wakeup_accesses\" value=\"%i\"/>", "instr.fp.wakeup", Scope::PerCore(core));
		builder.literal("\t\t\t<!--  RF accesses -->");
		builder.stat("\t\t\t<stat name=\"int_regfile_reads\" value=\"%i\"/>", "RF_accesses.int_regfile_reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"float_regfile_reads\" value=\"%i\"/>", "RF_accesses.fp_regfile_reads", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"int_regfile_writes\" value=\"%i\"/>", "RF_accesses.int_regfile_writes", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"float_regfile_writes\" value=\"%i\"/>", "RF_accesses.fp_regfile_writes", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- accesses to the working reg -->");
		builder.stat("\t\t\t<stat name=\"function_calls\" value=\"%i\"/>", "function_calls", Scope::PerCore(core));
		builder.literal("\t\t\t<stat name=\"context_switches\" value=\"0\"/>");
		builder.literal("\t\t\t<!-- Number of Windowes switches (number of function calls and returns)-->");
		builder.literal("\t\t\t<!-- Alu stats by default, the processor has one FPU that includes the divider and ");
		builder.literal("\t\t\t multiplier. The fpu accesses should include accesses to multiplier and divider  -->");
		builder.stat("\t\t\t<stat name=\"ialu_access\" value=\"%i\"/>", "window_switches.ialu_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"fpu_access\" value=\"%i\"/>", "window_switches.fpu_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"mul_accesses\" value=\"%i\"/>", "window_switches.mul_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"cdb_alu_accesses\" value=\"%i\"/>", "window_switches.cdb_alu_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"cdb_mul_accesses\" value=\"%i\"/>", "window_switches.cdb_mul_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"cdb_fpu_accesses\" value=\"%i\"/>", "window_switches.cdb_fpu_accesses", Scope::PerCore(core));
		builder.literal("\t\t\t<!-- multiple cycle accesses should be counted multiple times, ");
		builder.literal("\t\t\totherwise, McPAT can use internal counter for different floating point instructions ");
		builder.literal("\t\t\tto get final accesses. But that needs detailed info for floating point inst mix -->");
		builder.literal("\t\t\t<!--  currently the performance simulator should ");
		builder.literal("\t\t\tmake sure all the numbers are final numbers, ");
		builder.literal("\t\t\tincluding the explicit read/write accesses, ");
		builder.literal("\t\t\tand the implicite accesses such as replacements and etc.");
		builder.literal("\t\t\tFuture versions of McPAT may be able to reason the implicite access");
		builder.literal("\t\t\tbased on param and stats of last level cache");
		builder.literal("\t\t\tThe same rule applies to all cache access stats too!  -->");
		builder.stat("\t\t\t<stat name=\"IFU_duty_cycle\" value=\"%f\"/>", "IFU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"LSU_duty_cycle\" value=\"%f\"/>", "LSU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"MemManU_I_duty_cycle\" value=\"%f\"/>", "IFU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"MemManU_D_duty_cycle\" value=\"%f\"/>", "MemManU.D.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"ALU_duty_cycle\" value=\"%f\"/>", "ALU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"MUL_duty_cycle\" value=\"%f\"/>", "MUL.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"FPU_duty_cycle\" value=\"%f\"/>", "FPU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"ALU_cdb_duty_cycle\" value=\"%f\"/>", "ALU.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"MUL_cdb_duty_cycle\" value=\"%f\"/>", "MUL.duty_cycle", Scope::PerCore(core));
		builder.stat("\t\t\t<stat name=\"FPU_cdb_duty_cycle\" value=\"%f\"/>", "FPU.duty_cycle", Scope::PerCore(core));
		builder.literal("\t\t\t<param name=\"number_of_BPT\" value=\"2\"/>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.predictor\" name=\"PBT\">"));
		builder.literal("\t\t\t\t<!-- branch predictor; tournament predictor see Alpha implementation -->");
		builder.literal("\t\t\t\t<param name=\"local_predictor_size\" value=\"10,3\"/>");
		builder.literal("\t\t\t\t<param name=\"local_predictor_entries\" value=\"1024\"/>");
		builder.literal("\t\t\t\t<param name=\"global_predictor_entries\" value=\"4096\"/>");
		builder.literal("\t\t\t\t<param name=\"global_predictor_bits\" value=\"2\"/>");
		builder.literal("\t\t\t\t<param name=\"chooser_predictor_entries\" value=\"4096\"/>");
		builder.literal("\t\t\t\t<param name=\"chooser_predictor_bits\" value=\"2\"/>");
		builder.literal("\t\t\t</component>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.itlb\" name=\"itlb\">"));
		builder.literal("\t\t\t\t<param name=\"number_entries\" value=\"128\"/>");
		builder.stat("\t\t\t\t<stat name=\"total_accesses\" value=\"%i\"/>", "itlb.total_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"total_misses\" value=\"%i\"/>", "itlb.total_misses", Scope::PerCore(core));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.literal("\t\t\t\t<!-- there is no write requests to itlb although writes happen to itlb after miss,");
		builder.literal("\t\t\t\twhich is actually a replacement -->");
		builder.literal("\t\t\t</component>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.icache\" name=\"icache\">"));
		builder.literal("\t\t\t\t<!-- there is no write requests to itlb although writes happen to it after miss, ");
		builder.literal("\t\t\t\twhich is actually a replacement -->");
		builder.comb("\t\t\t\t<param name=\"icache_config\" value=\"%i,%i,%i,%i,%i,%i, %i, %i\"/>", "icache_cfg", Scope::PerCore(core));
		builder.literal("\t\t\t\t<!-- the parameters are capacity,block_width, associativity,bank, throughput w.r.t. core clock, latency w.r.t. core clock,-->");
		builder.literal("\t\t\t\t<param name=\"buffer_sizes\" value=\"16, 16, 16, 0\"/>");
		builder.literal("\t\t\t\t<!-- cache controller buffer sizes: miss_buffer_size(MSHR),fill_buffer_size,prefetch_buffer_size,wb_buffer_size-->");
		builder.stat("\t\t\t\t<stat name=\"read_accesses\" value=\"%i\"/>", "icache.read_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"read_misses\" value=\"%i\"/>", "icache.read_misses", Scope::PerCore(core));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.literal("\t\t\t</component>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.dtlb\" name=\"dtlb\">"));
		builder.literal("\t\t\t\t<param name=\"number_entries\" value=\"256\"/>");
		builder.stat("\t\t\t\t<stat name=\"total_accesses\" value=\"%i\"/>", "dtlb.total_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"total_misses\" value=\"%i\"/>", "dtlb.total_misses", Scope::PerCore(core));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.literal("\t\t\t</component>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.dcache\" name=\"dcache\">"));
		builder.literal("\t\t\t\t<!-- all the buffer related are optional -->");
		builder.comb("\t\t\t\t<param name=\"dcache_config\" value=\"%i,%i,%i,%i,%i,%i, %i, %i\"/>", "dcache_cfg", Scope::PerCore(core));
		builder.literal("\t\t\t\t<param name=\"buffer_sizes\" value=\"16, 16, 16, 16\"/>");
		builder.literal("\t\t\t\t<!-- cache controller buffer sizes: miss_buffer_size(MSHR),fill_buffer_size,prefetch_buffer_size,wb_buffer_size-->");
		builder.stat("\t\t\t\t<stat name=\"read_accesses\" value=\"%i\"/>", "dcache.read_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"write_accesses\" value=\"%i\"/>", "dcache.write_accesses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"read_misses\" value=\"%i\"/>", "dcache.read_misses", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"write_misses\" value=\"%i\"/>", "dcache.write_misses", Scope::PerCore(core));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops\" value=\"%i\"/>", "dcache.pic_copy_ops", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops_in_bank\" value=\"%i\"/>", "dcache.pic_copy_ops_in_bank", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_tag_access\" value=\"%i\"/>", "dcache.pic_copy_tag_access", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_read_miss\" value=\"%i\"/>", "dcache.pic_copy_read_miss", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_write_miss\" value=\"%i\"/>", "dcache.pic_copy_write_miss", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops\" value=\"%i\"/>", "dcache.pic_cmp_ops", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops_in_bank\" value=\"%i\"/>", "dcache.pic_cmp_ops_in_bank", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_tag_access\" value=\"%i\"/>", "dcache.pic_cmp_tag_access", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_read_miss\" value=\"%i\"/>", "dcache.pic_cmp_read_miss", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_write_miss\" value=\"%i\"/>", "dcache.pic_cmp_write_miss", Scope::PerCore(core));
		builder.stat("\t\t\t\t<stat name=\"pic_search_key_writes\" value=\"%i\"/>", "dcache.pic_key_writes", Scope::PerCore(core));
		builder.literal("\t\t\t</component>");
		builder.literal(format!("\t\t\t<component id=\"system.core{core}.BTB\" name=\"BTB\">"));
		builder.literal("\t\t\t\t<!-- all the buffer related are optional -->");
		builder.literal("\t\t\t\t<param name=\"BTB_config\" value=\"18944,8,4,1, 1,3\"/>");
		builder.stat("\t\t\t\t<stat name=\"read_accesses\" value=\"%i\"/>", "BTB.read_accesses", Scope::PerCore(core));
		builder.literal("\t\t\t\t<stat name=\"write_accesses\" value=\"0\"/>");
		builder.literal("\t\t\t\t<!-- the parameters are capacity,block_width,associativity,bank, throughput w.r.t. core clock, latency w.r.t. core clock,-->");
		builder.literal("\t\t\t</component>");
		builder.literal("\t</component>");
		builder.literal("\t\t\t<!--**********************************************************************-->");
	}
	// L2 banks
	for bank in 0..num_l2s {
		builder.literal(format!("\t\t<component id=\"system.L2{bank}\" name=\"L2{bank}\">"));
		builder.comb("\t\t\t\t<param name=\"L2_config\" value=\"%i,%i,%i,%i,%i,%i, %i, %i\"/>", "L2_config", Scope::PerCore(bank));
		builder.literal("\t\t\t\t<param name=\"buffer_sizes\" value=\"16, 16, 16, 16\"/>");
		builder.cfg("\t\t\t\t<param name=\"clockrate\" value=\"%i\"/>", "L2_clock", Scope::PerCore(bank));
		builder.cfg("\t\t\t\t<param name=\"vdd\" value=\"%f\"/><!-- 0 means using ITRS default vdd -->", "L2_vdd", Scope::PerCore(bank));
		builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
		builder.literal("\t\t\t\t<param name=\"ports\" value=\"1,1,1\"/>");
		builder.literal("\t\t\t\t<param name=\"device_type\" value=\"0\"/>");
		builder.stat("\t\t\t\t<stat name=\"read_accesses\" value=\"%i\"/>", "L2.read_accesses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"write_accesses\" value=\"%i\"/>", "L2.write_accesses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"read_misses\" value=\"%i\"/>", "L2.read_misses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"write_misses\" value=\"%i\"/>", "L2.write_misses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops\" value=\"%i\"/>", "L2.pic_copy_ops", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops_in_bank\" value=\"%i\"/>", "L2.pic_copy_ops_in_bank", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_tag_access\" value=\"%i\"/>", "L2.pic_copy_tag_access", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_read_miss\" value=\"%i\"/>", "L2.pic_copy_read_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_write_miss\" value=\"%i\"/>", "L2.pic_copy_write_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops\" value=\"%i\"/>", "L2.pic_cmp_ops", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops_in_bank\" value=\"%i\"/>", "L2.pic_cmp_ops_in_bank", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_tag_access\" value=\"%i\"/>", "L2.pic_cmp_tag_access", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_read_miss\" value=\"%i\"/>", "L2.pic_cmp_read_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_write_miss\" value=\"%i\"/>", "L2.pic_cmp_write_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_search_key_writes\" value=\"%i\"/>", "L2.pic_key_writes", Scope::PerCore(bank));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.stat("\t\t\t\t<stat name=\"duty_cycle\" value=\"%f\"/>", "L2_duty_cycle", Scope::PerCore(bank));
		builder.literal("\t\t</component>");
	}
	// L3 banks
	for bank in 0..num_l3s {
		builder.literal(format!("\t\t<component id=\"system.L3{bank}\" name=\"L3{bank}\">"));
		builder.comb("\t\t\t\t<param name=\"L3_config\" value=\"%i,%i,%i, %i, %i, %i,%i\"/>", "L3_config", Scope::PerCore(bank));
		builder.literal("\t\t<!-- the parameters are capacity,block_width, associativity,bank, throughput w.r.t. core clock, latency w.r.t. core clock,-->");
		builder.cfg("\t\t\t\t<param name=\"clockrate\" value=\"%i\"/>", "L3_clock", Scope::PerCore(bank));
		builder.cfg("\t\t\t\t<param name=\"vdd\" value=\"%f\"/><!-- 0 means using ITRS default vdd -->", "L3_vdd", Scope::PerCore(bank));
		builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
		builder.literal("\t\t\t\t<param name=\"ports\" value=\"1,1,1\"/>");
		builder.literal("\t\t\t\t<param name=\"device_type\" value=\"0\"/>");
		builder.literal("\t\t\t\t<param name=\"buffer_sizes\" value=\"16, 16, 16, 16\"/>");
		builder.literal("\t\t\t\t<!-- cache controller buffer sizes: miss_buffer_size(MSHR),fill_buffer_size,prefetch_buffer_size,wb_buffer_size-->");
		builder.stat("\t\t\t\t<stat name=\"read_accesses\" value=\"%i\"/>", "L3.read_accesses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"write_accesses\" value=\"%i\"/>", "L3.write_accesses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"read_misses\" value=\"%i\"/>", "L3.read_misses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"write_misses\" value=\"%i\"/>", "L3.write_misses", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops\" value=\"%i\"/>", "L3.pic_copy_ops", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_ops_in_bank\" value=\"%i\"/>", "L3.pic_copy_ops_in_bank", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_tag_access\" value=\"%i\"/>", "L3.pic_copy_tag_access", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_read_miss\" value=\"%i\"/>", "L3.pic_copy_read_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_copy_write_miss\" value=\"%i\"/>", "L3.pic_copy_write_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops\" value=\"%i\"/>", "L3.pic_cmp_ops", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_ops_in_bank\" value=\"%i\"/>", "L3.pic_cmp_ops_in_bank", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_tag_access\" value=\"%i\"/>", "L3.pic_cmp_tag_access", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_read_miss\" value=\"%i\"/>", "L3.pic_cmp_read_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_cmp_write_miss\" value=\"%i\"/>", "L3.pic_cmp_write_miss", Scope::PerCore(bank));
		builder.stat("\t\t\t\t<stat name=\"pic_search_key_writes\" value=\"%i\"/>", "L3.pic_key_writes", Scope::PerCore(bank));
		builder.literal("\t\t\t\t<stat name=\"conflicts\" value=\"0\"/>");
		builder.stat("\t\t\t\t<stat name=\"duty_cycle\" value=\"%f\"/>", "L3_duty_cycle", Scope::PerCore(bank));
		builder.literal("\t\t</component>");
	}
	builder.literal("\t\t\t<!--**********************************************************************-->");
	// Network
	builder.literal("\t\t<component id=\"system.NoC0\" name=\"noc0\">");
	// Note: The NoC fields are bound to the last cache bank (or core) laid out above
	let noc_scope = Scope::PerCore(
		[num_l3s, num_l2s, ncores]
			.into_iter()
			.find(|&count| count > 0)
			.map_or(0, |count| count - 1),
	);
	builder.cfg("\t\t\t<param name=\"clockrate\" value=\"%i\"/>", "NoC_clock", noc_scope);
	builder.cfg("\t\t\t<param name=\"vdd\" value=\"%f\"/><!-- 0 means using ITRS default vdd -->", "NoC_vdd", noc_scope);
	builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
	builder.stat("\t\t\t<param name=\"type\" value=\"%d\"/>", "NoC.type", Scope::SystemWide);
	builder.literal("\t\t\t<!--0:bus, 1:NoC , for bus no matter how many nodes sharing the bus at each time only one node can send req -->");
	builder.literal("\t\t\t<param name=\"horizontal_nodes\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"vertical_nodes\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"has_global_link\" value=\"0\"/>");
	builder.literal("\t\t\t<param name=\"link_throughput\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"link_latency\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"input_ports\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"output_ports\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"flit_bits\" value=\"256\"/>");
	builder.literal("\t\t\t<param name=\"chip_coverage\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"link_routing_over_percentage\" value=\"0.5\"/>");
	builder.stat("\t\t\t<stat name=\"total_accesses\" value=\"%i\"/>", "NoC.total_accesses", Scope::SystemWide);
	builder.stat("\t\t\t<stat name=\"duty_cycle\" value=\"%f\"/>", "NoC.duty_cycle", Scope::SystemWide);
	builder.literal("\t\t</component>");
	builder.literal("\t\t\t<!--**********************************************************************-->");
	// Memory controller and unused controllers
	builder.literal("\t\t<component id=\"system.mc\" name=\"mc\">");
	builder.literal("\t\t\t<!-- current version of McPAT uses published values for base parameters of memory controller");
	builder.literal("\t\t\timprovments on MC will be added in later versions. -->");
	builder.literal("\t\t\t<param name=\"mc_clock\" value=\"200\"/><!--MHz-->");
	builder.literal("\t\t\t<param name=\"vdd\" value=\"0\"/><!-- 0 means using ITRS default vdd -->");
	builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
	builder.literal("\t\t\t<param name=\"peak_transfer_rate\" value=\"3200\"/>");
	builder.literal("\t\t\t<param name=\"block_size\" value=\"64\"/><!--B-->");
	builder.literal("\t\t\t<param name=\"number_mcs\" value=\"0\"/>");
	builder.literal("\t\t\t<!-- current McPAT only supports homogeneous memory controllers -->");
	builder.literal("\t\t\t<param name=\"memory_channels_per_mc\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"number_ranks\" value=\"2\"/>");
	builder.literal("\t\t\t<param name=\"withPHY\" value=\"0\"/>");
	builder.literal("\t\t\t<param name=\"req_window_size_per_channel\" value=\"32\"/>");
	builder.literal("\t\t\t<param name=\"IO_buffer_size_per_channel\" value=\"32\"/>");
	builder.literal("\t\t\t<param name=\"databus_width\" value=\"128\"/>");
	builder.literal("\t\t\t<param name=\"addressbus_width\" value=\"51\"/>");
	builder.literal("\t\t\t<!-- McPAT will add the control bus width to the addressbus width automatically -->");
	builder.stat("\t\t\t<stat name=\"memory_accesses\" value=\"%i\"/>", "memory.accesses", Scope::SystemWide);
	builder.stat("\t\t\t<stat name=\"memory_reads\" value=\"%i\"/>", "memory.reads", Scope::SystemWide);
	builder.stat("\t\t\t<stat name=\"memory_writes\" value=\"%i\"/>", "memory.writes", Scope::SystemWide);
	builder.literal("\t\t\t<!-- McPAT does not track individual mc, instead, it takes the total accesses and calculate ");
	builder.literal("\t\t\tthe average power per MC or per channel. This is sufficent for most application. ");
	builder.literal("\t\t\tFurther trackdown can be easily added in later versions. -->");
	builder.literal("\t\t</component>");
	builder.literal("\t\t<component id=\"system.niu\" name=\"niu\">");
	builder.literal("\t\t\t<param name=\"type\" value=\"0\"/> <!-- 1: low power; 0 high performance -->");
	builder.literal("\t\t\t<param name=\"clockrate\" value=\"350\"/>");
	builder.literal("\t\t\t<param name=\"vdd\" value=\"0\"/><!-- 0 means using ITRS default vdd -->");
	builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
	builder.literal("\t\t\t<param name=\"number_units\" value=\"0\"/> <!-- unlike PCIe and memory controllers, each Ethernet controller only have one port -->");
	builder.literal("\t\t\t<stat name=\"duty_cycle\" value=\"1.0\"/> <!-- achievable max load <= 1.0 -->");
	builder.literal("\t\t\t<stat name=\"total_load_perc\" value=\"0.7\"/> <!-- ratio of total achived load to total achivable bandwidth  -->");
	builder.literal("\t\t</component>");
	builder.literal("\t\t<component id=\"system.pcie\" name=\"pcie\">");
	builder.literal("\t\t\t<!-- On chip PCIe controller, including Phy-->");
	builder.literal("\t\t\t<param name=\"type\" value=\"0\"/> <!-- 1: low power; 0 high performance -->");
	builder.literal("\t\t\t<param name=\"withPHY\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"clockrate\" value=\"350\"/>");
	builder.literal("\t\t\t<param name=\"vdd\" value=\"0\"/><!-- 0 means using ITRS default vdd -->");
	builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
	builder.literal("\t\t\t<param name=\"number_units\" value=\"0\"/>");
	builder.literal("\t\t\t<param name=\"num_channels\" value=\"8\"/> <!-- 2 ,4 ,8 ,16 ,32 -->");
	builder.literal("\t\t\t<stat name=\"duty_cycle\" value=\"1.0\"/> <!-- achievable max load <= 1.0 -->");
	builder.literal("\t\t\t<stat name=\"total_load_perc\" value=\"0.7\"/> <!-- Percentage of total achived load to total achivable bandwidth  -->");
	builder.literal("\t\t</component>");
	builder.literal("\t\t<component id=\"system.flashc\" name=\"flashc\">");
	builder.literal("\t\t\t<param name=\"number_flashcs\" value=\"0\"/>");
	builder.literal("\t\t\t<param name=\"type\" value=\"1\"/> <!-- 1: low power; 0 high performance -->");
	builder.literal("\t\t\t<param name=\"withPHY\" value=\"1\"/>");
	builder.literal("\t\t\t<param name=\"peak_transfer_rate\" value=\"200\"/><!--Per controller sustainable reak rate MB/S -->");
	builder.literal("\t\t\t<param name=\"vdd\" value=\"0\"/><!-- 0 means using ITRS default vdd -->");
	builder.literal("\t\t\t<param name=\"power_gating_vcc\" value=\"-1\"/><!-- -1 means using default power gating virtual power supply voltage constrained by technology and computed automatically-->");
	builder.literal("\t\t\t<stat name=\"duty_cycle\" value=\"1.0\"/> <!-- achievable max load <= 1.0 -->");
	builder.literal("\t\t\t<stat name=\"total_load_perc\" value=\"0.7\"/> <!-- Percentage of total achived load to total achivable bandwidth  -->");
	builder.literal("\t\t</component>");
	builder.literal("\t\t<!--**********************************************************************-->");
	builder.literal("\t</component>");
	builder.literal("</component>");

	Template::new(builder.entries)
}
